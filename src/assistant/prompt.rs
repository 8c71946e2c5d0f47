//! Context preamble sent with every assistant request

use crate::catalogue::types::{Category, CategoryId, Resource, Role};
use serde::Serialize;

/// Resource fields exposed to the model
#[derive(Serialize)]
struct ResourceSummary<'a> {
    id: &'a str,
    title: &'a str,
    category: CategoryId,
    description: &'a str,
    tags: &'a [String],
}

/// Build the system preamble: persona, category labels, a catalogue
/// snapshot and a tone hint for `role`.
///
/// The snapshot is the full catalogue, not filtered by role.
pub fn build_system_preamble(categories: &[Category], resources: &[Resource], role: Role) -> String {
    let labels: Vec<&str> = categories.iter().map(|c| c.label.as_str()).collect();
    let summaries: Vec<ResourceSummary<'_>> = resources
        .iter()
        .map(|r| ResourceSummary {
            id: &r.id,
            title: &r.title,
            category: r.category_id,
            description: &r.description,
            tags: &r.tags,
        })
        .collect();
    let snapshot = serde_json::to_string(&summaries).unwrap_or_else(|_| "[]".to_string());

    format!(
        "Eres \"NexusBot\", el asistente virtual del colegio EduNexus.\n\
         Ayudas a familias, alumnado y profesorado a encontrar recursos del catálogo escolar.\n\
         Responde siempre en español, con un tono amable, profesional y educativo.\n\
         \n\
         Categorías: {labels}.\n\
         Recursos disponibles: {snapshot}\n\
         \n\
         Busca primero en este catálogo y, si recomiendas un recurso, cita su título exacto.\n\
         Si lo que piden no está en el catálogo, puedes sugerir recursos educativos generales \
         indicando que no forman parte de la base de datos del colegio.\n\
         \n\
         El usuario actual tiene el rol {role}. Ajusta tu tono en consecuencia.",
        labels = labels.join(", "),
        snapshot = snapshot,
        role = role,
    )
}
