//! Payload stability: normalizing a payload we built must give back the same
//! payload, whatever alias spelling the first record used.

use proptest::prelude::*;
use serde_json::{json, Value};

use super::a001_user::User;
use super::a002_role::Role;
use super::a003_permission::Permission;
use super::a004_visit::Visit;
use super::a005_camera::Camera;
use super::a006_zone::Zone;
use super::a007_invoice::Invoice;
use super::a008_payment::Payment;
use super::a009_fine::Fine;
use super::a010_maintenance_task::MaintenanceTask;
use super::a011_log_entry::LogEntry;
use super::a013_incident::Incident;
use super::a014_notification::Notification;
use super::a015_repair::Repair;
use super::a016_expense_audit::ExpenseAudit;
use super::a017_staff::StaffMember;
use super::a018_service::Service;
use super::a019_tag::Tag;
use super::a020_common_area::CommonArea;
use super::a021_resident::Resident;
use super::a022_owner::Owner;
use super::a023_tenant::Tenant;
use super::a024_vehicle::Vehicle;
use super::a025_unit::Unit;
use super::common::Resource;
use crate::shared::field_adapter::RawRecord;

fn assert_stable<R: Resource>(backend: Value) {
    let first = R::from_record(&RawRecord::from_value(backend)).to_payload();
    let second = R::from_record(&RawRecord::from(first.clone())).to_payload();
    assert_eq!(first, second, "{} payload drifted", R::collection_name());
}

#[test]
fn test_users() {
    assert_stable::<User>(json!({
        "uuid": "u-1", "username": "ana", "email": "ana@x.bo", "nombres": "Ana",
        "apellidos": "Rojas", "phone": "700", "activo": false,
        "roles": [{"id": 2, "name": "Admin"}]
    }));
}

#[test]
fn test_roles_and_permissions() {
    assert_stable::<Role>(json!({"pk": 1, "name": "Guardia", "permisos": [1, {"id": 2}]}));
    assert_stable::<Permission>(json!({"id": 9, "nombre": "Ver", "codigo": "view", "app": "core"}));
}

#[test]
fn test_visits() {
    assert_stable::<Visit>(json!({
        "visitante": "Raúl", "dni": "123", "asunto": "Entrega",
        "unit_uuid": "un-5", "checkin": "2024-06-01T10:00:00Z", "vehiculo": "ABC-1",
        "authorized_by": {"id": 3, "name": "Portero"}
    }));
}

#[test]
fn test_cameras_and_zones() {
    assert_stable::<Camera>(json!({
        "alias": "Lobby", "host": "10.0.0.2", "port": 554, "stream": "rtsp://x",
        "snapshot": "http://x/jpg", "zone": {"id": 4, "nombre": "Hall"}, "active": false
    }));
    assert_stable::<Zone>(json!({
        "titulo": "Piscina", "detalle": "Techada", "cupo": "20", "status": false,
        "edificio": "B", "hora_inicio": "08:00", "end_time": "21:00", "hex": "#00ff00"
    }));
}

#[test]
fn test_finance() {
    assert_stable::<Invoice>(json!({
        "serial": "F-1", "persona_id": 3, "customer_name": "Ana", "unit_id": 8,
        "issue_date": "2024-06-01", "due_date": "2024-06-30", "currency": "USD",
        "detalle": [{"description": "Expensa", "qty": 2, "unit_price": "50.005"}],
        "amount_subtotal": 100.01, "iva": 13.0, "discount": 0, "amount_total": 113.01
    }));
    assert_stable::<Payment>(json!({
        "invoice": {"id": 31}, "paid_at": "2024-06-02", "amount": "10.5",
        "forma": "QR", "voucher": "V-1", "status": "PENDIENTE", "nota": "x"
    }));
    assert_stable::<Fine>(json!({
        "numero": "M-1", "description": "Ruido", "type": "CONVIVENCIA", "amount": 200,
        "created_at": "2024-06-01", "due_date": "2024-06-10", "daily_interest": 1,
        "resident_id": "r-1", "invoice_id": 12, "notes": "x"
    }));
}

#[test]
fn test_operations() {
    assert_stable::<MaintenanceTask>(json!({
        "code": "T-1", "title": "Bomba", "estado": "EN_PROCESO", "prioridad": "ALTA",
        "assignee": 2, "service_id": 3, "asset": {"id": 4}, "amenity": 5,
        "fecha_programada": "2024-06-01", "end_date": "2024-06-05",
        "fecha_inicio": "2024-06-01T08:00:00Z", "recurrencia": "MENSUAL",
        "estimado_horas": "3", "costo_estimado": 120.5, "activo": false, "notas": "x"
    }));
    assert_stable::<LogEntry>(json!({
        "created_at": "2024-06-03T22:45:10Z", "shift": "NOCHE", "category": "SEGURIDAD",
        "titulo": "Ronda", "detalle": "Sin novedad", "personal": 4, "estado": "CERRADO",
        "task_id": 9, "attachment": "http://x/f.jpg", "notes": "x"
    }));
}

#[test]
fn test_incidents_and_repairs() {
    assert_stable::<Incident>(json!({
        "asunto": "Fuga", "detalle": "Baño 2", "type": "AGUA", "severity": "ALTA",
        "status": "EN_PROCESO", "unit_uuid": "u-3", "created_by": {"id": 2, "name": "Ruiz"},
        "encargado": 5, "reported_at": "2024-06-01T10:00:00Z", "image": "http://x/a.jpg"
    }));
    assert_stable::<Repair>(json!({
        "wo": "WO-1", "title": "Bomba", "vendor_id": 3, "amenity": 4, "incident": {"id": 12},
        "date": "2024-06-02", "materials": "10.5", "labor": 20, "tax": 3.9, "currency": "USD"
    }));
    assert_stable::<ExpenseAudit>(json!({
        "date": "2024-06-02", "category": "Mantenimiento", "subcategory": "Bombas",
        "vendor": {"id": 3, "nombre": "Hidro"}, "neto": "100", "tax": 13, "other_costs": 2,
        "invoice_id": 31, "invoice_number": "F-31", "repair_id": 1, "status": "OBSERVADO"
    }));
}

#[test]
fn test_notifications_and_tags() {
    assert_stable::<Notification>(json!({
        "title": "Corte de agua", "body": "9:00", "category": "AVISO", "priority": "critical",
        "channel": "sms", "status": "ENVIADA", "to": {"id": 5}, "scope": "UNIDAD",
        "scheduled_at": "2024-06-01T09:00:00Z"
    }));
    assert_stable::<Notification>(json!({"prioridad": "urgent", "canal": "whatsapp", "leida": true}));
    assert_stable::<Tag>(json!({"uuid": "t-1", "name": "Área Común", "color": "#00FF00", "is_active": false}));
}

#[test]
fn test_people() {
    assert_stable::<StaffMember>(json!({
        "nombre": "Luis", "apellido": "Mamani", "doc": "44", "celular": "7", "address": "Calle 1",
        "position": "Guardia", "department": "Seguridad", "unit_id": 2, "shift": "NOCHE",
        "ingreso": "2023-01-15", "salary": "3200", "estado": false, "foto": "http://x/p.jpg"
    }));
    assert_stable::<Resident>(json!({
        "first_name": "Sofía", "apellidos": "Vargas", "identidad": "99", "phone": "7",
        "relacion": "Hija", "birth_date": "2010-02-14", "unit_uuid": "a1", "is_active": false
    }));
    assert_stable::<Tenant>(json!({
        "nombres": "Pedro", "ci": "123", "unidad": {"id": 7, "codigo": "A-101"},
        "fecha_alta": "2024-01-01", "end_date": "2024-12-31"
    }));
    assert_stable::<Owner>(json!({
        "usuario_data": {"id": 14, "username": "jperez"}, "estado": "inactivo"
    }));
}

#[test]
fn test_property() {
    assert_stable::<Unit>(json!({
        "uid": "u-1", "code": "A-101", "name": "Depto 101", "tower": "A", "numero": 101,
        "floor": "1", "superficie": "82.5", "activo": false, "owner_id": 14, "notes": "x"
    }));
    assert_stable::<Vehicle>(json!({
        "plate": " 2345 abc ", "brand": "Toyota", "model": "Hilux", "color": "Rojo",
        "status": "ACTIVO", "unidad": {"id": 7}
    }));
    assert_stable::<CommonArea>(json!({
        "name": "Churrasquera", "categoria": "BBQ", "location": "Terraza", "capacity": "12",
        "status": false, "bookable": true, "tarifa": "50", "start_time": "10:00",
        "open_to": "22:00", "policies": "x", "color": "#ff0000"
    }));
    assert_stable::<Service>(json!({
        "name": "Jardinería", "type": "LIMPIEZA", "vendor_id": 3, "price": "450", "frequency": "ANUAL",
        "fecha_inicio": "2024-01-01", "end_date": "2024-12-31", "amenity": 4, "estado": false
    }));
}

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 áéñ-]{0,12}"
}

proptest! {
    #[test]
    fn prop_visit_payload_stable(
        name in text(),
        doc in text(),
        unit in proptest::option::of(1i64..10_000),
        check_in in proptest::option::of("[0-9]{2}:[0-9]{2}"),
        check_out in proptest::option::of("[0-9]{2}:[0-9]{2}"),
    ) {
        let mut raw = serde_json::Map::new();
        raw.insert("name".into(), json!(name));
        raw.insert("doc".into(), json!(doc));
        if let Some(unit) = unit {
            raw.insert("unit".into(), json!({"pk": unit, "name": "x"}));
        }
        if let Some(t) = check_in {
            raw.insert("entrada".into(), json!(t));
        }
        if let Some(t) = check_out {
            raw.insert("time_out".into(), json!(t));
        }
        let first = Visit::from_record(&RawRecord::new(raw)).to_payload();
        let second = Visit::from_record(&RawRecord::from(first.clone())).to_payload();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_fine_payload_stable(
        reason in text(),
        cents in 0u32..10_000_000,
        as_string in any::<bool>(),
        unit in proptest::option::of(1i64..10_000),
    ) {
        let amount = f64::from(cents) / 100.0;
        let amount_value = if as_string { json!(amount.to_string()) } else { json!(amount) };
        let mut raw = serde_json::Map::new();
        raw.insert("reason".into(), json!(reason));
        raw.insert("amount".into(), amount_value);
        if let Some(unit) = unit {
            raw.insert("unidad_id".into(), json!(unit));
        }
        let first = Fine::from_record(&RawRecord::new(raw)).to_payload();
        let second = Fine::from_record(&RawRecord::from(first.clone())).to_payload();
        prop_assert_eq!(first, second);
    }
}
