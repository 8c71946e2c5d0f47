//! Categories and resources loaded at startup

use crate::catalogue::types::*;
use chrono::NaiveDate;

/// The fixed category set
pub fn builtin_categories() -> Vec<Category> {
    vec![
        category(
            CategoryId::Castellano,
            "Lengua Castellana",
            "Gramática, literatura y comprensión lectora.",
            "BookOpen",
            "red",
        ),
        category(
            CategoryId::Catalan,
            "Llengua Catalana",
            "Recursos de gramàtica i literatura catalana.",
            "Languages",
            "yellow",
        ),
        category(
            CategoryId::Ingles,
            "English & Foreign Lang",
            "Vocabulary, listening and reading skills.",
            "Globe",
            "blue",
        ),
        category(
            CategoryId::Social,
            "Medio Social y Natural",
            "Historia, geografía y ciencias naturales.",
            "Users",
            "green",
        ),
        category(
            CategoryId::Cultural,
            "Actividades Culturales",
            "Teatro, museos y salidas escolares.",
            "Palette",
            "purple",
        ),
        category(
            CategoryId::Extraescolar,
            "Extraescolares",
            "Deportes, música y clubes de tarde.",
            "Music",
            "orange",
        ),
        category(
            CategoryId::Profesores,
            "Sala de Profesores",
            "Programaciones y recursos internos.",
            "GraduationCap",
            "slate",
        ),
    ]
}

/// Preloaded resources, most relevant first
pub fn builtin_resources() -> Vec<Resource> {
    vec![
        Resource {
            is_featured: true,
            ..resource(
                "1",
                "Guía de Sintaxis Básica",
                "Resumen visual para el análisis sintáctico de oraciones simples.",
                CategoryId::Castellano,
                ResourceKind::Pdf,
                &["gramática", "ESO", "repaso"],
                (2023, 10, 15),
                Role::Student,
            )
        },
        resource(
            "2",
            "Lista de Lecturas Recomendadas 2024",
            "Libros seleccionados por el departamento para 1º y 2º de Primaria.",
            CategoryId::Castellano,
            ResourceKind::Document,
            &["lectura", "primaria"],
            (2023, 9, 1),
            Role::Parent,
        ),
        resource(
            "3",
            "Exercicis de Pronoms Febles",
            "Activitats interactives per practicar els pronoms.",
            CategoryId::Catalan,
            ResourceKind::Link,
            &["gramàtica", "batxillerat"],
            (2023, 11, 10),
            Role::Student,
        ),
        Resource {
            is_featured: true,
            ..resource(
                "4",
                "Present Simple vs Present Continuous",
                "Video explainer covering the main differences and usage rules.",
                CategoryId::Ingles,
                ResourceKind::Video,
                &["grammar", "present simple", "verbs"],
                (2023, 12, 5),
                Role::Student,
            )
        },
        resource(
            "4b",
            "Present Simple Worksheets",
            "Downloadable PDF exercises to practice Present Simple structure in positive, negative and questions.",
            CategoryId::Ingles,
            ResourceKind::Pdf,
            &["grammar", "present simple", "exercises"],
            (2024, 1, 15),
            Role::Student,
        ),
        resource(
            "4c",
            "Daily Routines Vocabulary",
            "Flashcards for daily routines, perfect for practicing Present Simple sentences.",
            CategoryId::Ingles,
            ResourceKind::Link,
            &["vocabulary", "present simple", "speaking"],
            (2024, 1, 20),
            Role::Student,
        ),
        resource(
            "5",
            "Mapa Interactivo de Europa",
            "Herramienta para aprender las capitales y ríos principales.",
            CategoryId::Social,
            ResourceKind::Link,
            &["geografía", "interactivo"],
            (2023, 10, 20),
            Role::Student,
        ),
        resource(
            "6",
            "Horarios de Fútbol Sala y Baloncesto",
            "Calendario trimestral de partidos y entrenamientos.",
            CategoryId::Extraescolar,
            ResourceKind::Pdf,
            &["deportes", "horario"],
            (2024, 1, 10),
            Role::Parent,
        ),
        resource(
            "7",
            "Programación Didáctica - Curso 23/24",
            "Documento oficial con los objetivos anuales por ciclo.",
            CategoryId::Profesores,
            ResourceKind::Document,
            &["interno", "planificación"],
            (2023, 9, 1),
            Role::Teacher,
        ),
        resource(
            "8",
            "Actas de Evaluación - 1er Trimestre",
            "Plantillas para rellenar las notas de evaluación.",
            CategoryId::Profesores,
            ResourceKind::Document,
            &["evaluación", "administrativo"],
            (2023, 12, 15),
            Role::Teacher,
        ),
    ]
}

fn category(id: CategoryId, label: &str, description: &str, icon: &str, color: &str) -> Category {
    Category {
        id,
        label: label.to_string(),
        description: description.to_string(),
        icon_name: icon.to_string(),
        color: color.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn resource(
    id: &str,
    title: &str,
    description: &str,
    category_id: CategoryId,
    kind: ResourceKind,
    tags: &[&str],
    (year, month, day): (i32, u32, u32),
    min_role: Role,
) -> Resource {
    Resource {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category_id,
        kind,
        url: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        date_added: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        min_role,
        is_featured: false,
        author: None,
    }
}
