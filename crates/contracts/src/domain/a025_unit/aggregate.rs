use serde::{Deserialize, Serialize};

use crate::domain::common::Resource;
use crate::shared::field_adapter::{EntityRef, Payload, RawRecord};
use crate::shared::record_id::RecordId;

const ID: &[&str] = &["id", "uuid", "uid", "pk", "unidad_id"];
const CODE: &[&str] = &["codigo", "code"];
const NAME: &[&str] = &["nombre", "name"];
const TOWER: &[&str] = &["torre", "tower", "bloque"];
const NUMBER: &[&str] = &["numero", "number"];
const FLOOR: &[&str] = &["piso", "floor"];
const AREA_M2: &[&str] = &["area_m2", "superficie", "area"];
const ACTIVE: &[&str] = &["estado", "activo", "is_active"];
const OWNER: &[&str] = &["propietario", "owner", "propietario_id", "owner_id"];
const REMARK: &[&str] = &["observacion", "notes"];

/// Квартира / жилая единица
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Unit {
    pub id: Option<RecordId>,
    pub code: String,
    pub name: String,
    pub tower: String,
    pub number: String,
    pub floor: Option<i64>,
    pub area_m2: Option<f64>,
    pub active: bool,
    pub owner: Option<EntityRef>,
    pub remark: String,
}

impl Unit {
    /// Select-box label: name, else code, else the id
    pub fn label(&self) -> String {
        [&self.name, &self.code]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .cloned()
            .or_else(|| self.id.as_ref().map(RecordId::to_string))
            .unwrap_or_default()
    }

    /// Reference for pickers in resident, tenant and vehicle forms
    pub fn as_ref_option(&self) -> Option<EntityRef> {
        self.id.clone().map(|id| EntityRef {
            id,
            label: Some(self.label()),
        })
    }
}

impl Resource for Unit {
    fn resource_index() -> &'static str {
        "a025"
    }

    fn collection_name() -> &'static str {
        "units"
    }

    fn element_name() -> &'static str {
        "Unidad"
    }

    fn list_name() -> &'static str {
        "Unidades"
    }

    fn candidate_paths() -> &'static [&'static str] {
        &["unidades/", "units/"]
    }

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(ID),
            code: raw.pick_str(CODE, ""),
            name: raw.pick_str(NAME, ""),
            tower: raw.pick_str(TOWER, ""),
            number: raw.pick_str(NUMBER, ""),
            floor: raw.pick_opt_i64(FLOOR),
            area_m2: raw.pick_opt_f64(AREA_M2),
            active: raw.pick_bool(ACTIVE, true),
            owner: raw.pick_ref(OWNER),
            remark: raw.pick_str(REMARK, ""),
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .set("codigo", self.code.as_str())
            .set("nombre", self.name.as_str())
            .set("torre", self.tower.as_str())
            .set("numero", self.number.as_str())
            .set_opt("piso", self.floor)
            .set_opt("area_m2", self.area_m2)
            .set("estado", self.active)
            .set_ref("propietario", self.owner.as_ref())
            .set("observacion", self.remark.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("El código de la unidad es obligatorio".into());
        }
        if self.area_m2.is_some_and(|a| a <= 0.0) {
            return Err("El área debe ser mayor a cero".into());
        }
        Ok(())
    }
}
