use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

const FIRST_NAME: &[&str] = &["nombres", "first_name", "nombre"];
const LAST_NAME: &[&str] = &["apellidos", "last_name", "apellido"];
const DOCUMENT: &[&str] = &["documento", "doc", "ci", "dni"];
const EMAIL: &[&str] = &["email"];
const PHONE: &[&str] = &["telefono", "phone", "celular"];
const ADDRESS: &[&str] = &["direccion", "address"];
const POSITION: &[&str] = &["cargo", "position", "puesto"];
const DEPARTMENT: &[&str] = &["departamento", "department"];
const UNIT: &[&str] = &["unidad", "unit", "unidad_id", "unit_id"];
const SHIFT: &[&str] = &["turno", "shift"];
const HIRE_DATE: &[&str] = &["fecha_ingreso", "hire_date", "ingreso"];
const SALARY: &[&str] = &["salario", "salary"];
const ACTIVE: &[&str] = &["activo", "is_active", "estado"];
const AVATAR: &[&str] = &["avatar", "foto"];

/// Сотрудник (охрана, уборка, администрация)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StaffMember {
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub position: String,
    pub department: String,
    pub unit: Option<EntityRef>,
    /// Mañana / Tarde / Noche or a free-form schedule
    pub shift: String,
    pub hire_date: String,
    pub salary: f64,
    pub active: bool,
    pub avatar: Option<String>,
}

impl StaffMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl Resource for StaffMember {
    fn resource_index() -> &'static str {
        "a017"
    }

    fn collection_name() -> &'static str {
        "staff"
    }

    fn element_name() -> &'static str {
        "Empleado"
    }

    fn list_name() -> &'static str {
        "Personal"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["personal/", "staff/", "empleados/", "rrhh/personal/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            first_name: raw.pick_str(FIRST_NAME, ""),
            last_name: raw.pick_str(LAST_NAME, ""),
            document: raw.pick_str(DOCUMENT, ""),
            email: raw.pick_str(EMAIL, ""),
            phone: raw.pick_str(PHONE, ""),
            address: raw.pick_str(ADDRESS, ""),
            position: raw.pick_str(POSITION, ""),
            department: raw.pick_str(DEPARTMENT, ""),
            unit: raw.pick_ref(UNIT),
            shift: raw.pick_str(SHIFT, ""),
            hire_date: raw.pick_str(HIRE_DATE, ""),
            salary: raw.pick_f64(SALARY, 0.0),
            active: raw.pick_bool(ACTIVE, true),
            avatar: raw.pick_opt_str(AVATAR),
        }
    }

    /// Names, phone, address and hire date travel under their English keys.
    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("first_name", self.first_name.as_str())
            .set("last_name", self.last_name.as_str())
            .set("documento", self.document.as_str())
            .set("email", self.email.as_str())
            .set("phone", self.phone.as_str())
            .set("address", self.address.as_str())
            .set("cargo", self.position.as_str())
            .set("departamento", self.department.as_str())
            .set_ref("unidad", self.unit.as_ref())
            .set("turno", self.shift.as_str())
            .set("hire_date", self.hire_date.as_str())
            .set("salario", self.salary)
            .set("is_active", self.active)
            .set_opt("avatar", self.avatar.clone())
    }

    fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("Los nombres son obligatorios".into());
        }
        if self.salary < 0.0 {
            return Err("El salario no puede ser negativo".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spanish_record_to_english_payload() {
        let member = StaffMember::from_record(&RawRecord::from_value(json!({
            "id": 2,
            "nombres": "Luis",
            "apellidos": "Mamani",
            "ci": "4455667",
            "celular": "71234567",
            "puesto": "Guardia",
            "ingreso": "2023-01-15",
            "salary": "3200"
        })));
        assert_eq!(member.full_name(), "Luis Mamani");
        assert_eq!(member.document, "4455667");
        assert_eq!(member.salary, 3200.0);
        assert!(member.active);

        let payload = member.to_payload();
        assert_eq!(payload.get("first_name"), Some(&json!("Luis")));
        assert_eq!(payload.get("phone"), Some(&json!("71234567")));
        assert_eq!(payload.get("hire_date"), Some(&json!("2023-01-15")));
        assert_eq!(payload.get("is_active"), Some(&json!(true)));
        assert!(!payload.contains("nombres"));
    }
}
