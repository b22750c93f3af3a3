//! Sample variants and inputs for the itinerary assistant demos.

use serde_json::json;
use fastprompt::utils::JsonMap;
use fastprompt::variant::{FewShot, PromptVariant};

pub const SYSTEM: &str = "Sos un asistente de una agencia de viajes. Respondé SOLO en JSON con las claves \
itinerario_resumido, mensaje_whatsapp y hoteldo_filtros.";

pub const TEMPLATE: &str = "destino: {destino}\n\
fechas desde {desde} hasta {hasta}\n\
adultos: {adultos}\n\
menores: {menores}\n\
presupuesto: {presupuesto}\n\
preferencias: {preferencias}";

/// A plain variant, one with a few-shot exchange and one with a checklist.
pub fn itinerary_variants() -> Vec<PromptVariant> {
    let checklist = vec![
        "destino".to_string(),
        "desayuno".to_string(),
        "playa".to_string(),
        "todo incluido".to_string(),
    ];
    vec![
        PromptVariant::new("v1_base", SYSTEM, TEMPLATE),
        PromptVariant::new("v2_fewshot", SYSTEM, TEMPLATE)
            .with_few_shots(vec![FewShot::new(
                "destino: Bariloche\nfechas desde 2025-07-01 hasta 2025-07-08\nadultos: 2\nmenores: 0",
                r#"{"hoteldo_filtros": {"destino": "Bariloche", "fecha_desde": "2025-07-01", "fecha_hasta": "2025-07-08"}}"#,
            )]),
        PromptVariant::new("v3_checklist", SYSTEM, TEMPLATE)
            .with_checklist(checklist),
    ]
}

/// A family trip to Cancún.
pub fn sample_inputs() -> JsonMap {
    let inputs = json!({
        "destino": "Cancún",
        "desde": "2025-01-10",
        "hasta": "2025-01-17",
        "adultos": 2,
        "menores": 1,
        "presupuesto": 1500,
        "preferencias": "cerca de la playa, con desayuno",
    });
    inputs.as_object().cloned().unwrap_or_default()
}
