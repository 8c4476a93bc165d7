//! Localized strings
//!
//! Only the strings the CLI board and the intake parser need. The intake
//! system instruction lives here because it is the per-language half of the
//! model request; the response schema is shared.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ToolStatus;

/// Supported UI languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

/// String table for one language
#[derive(Debug)]
pub struct Translations {
    pub app_title: &'static str,
    pub in_stock: &'static str,
    pub issued: &'static str,
    pub in_repair: &'static str,
    pub no_tools_here: &'static str,
    pub holder_label: &'static str,
    pub location_label: &'static str,
    pub parsing: &'static str,
    pub intake_error: &'static str,
    pub intake_system_instruction: &'static str,
}

impl Translations {
    /// Column title for a status
    pub fn status_title(&self, status: ToolStatus) -> &'static str {
        match status {
            ToolStatus::InStock => self.in_stock,
            ToolStatus::Issued => self.issued,
            ToolStatus::InRepair => self.in_repair,
        }
    }
}

static EN: Translations = Translations {
    app_title: "ToolTracker AI",
    in_stock: "In Stock",
    issued: "Issued",
    in_repair: "In Repair",
    no_tools_here: "No tools here.",
    holder_label: "Holder:",
    location_label: "Location:",
    parsing: "Parsing...",
    intake_error: "Failed to understand the tool details. Please try phrasing it differently.",
    intake_system_instruction: "You are a tool management assistant for a construction company. \
        Your role is to parse user input into a structured JSON tool object. \
        Extract the tool's name, its unique inventory code, a description if provided, \
        and who it's assigned to (currentHolder) and where it is (currentLocation).",
};

static RU: Translations = Translations {
    app_title: "Трекер Инструментов AI",
    in_stock: "На складе",
    issued: "Выдано",
    in_repair: "В ремонте",
    no_tools_here: "Здесь нет инструментов.",
    holder_label: "У кого:",
    location_label: "Где:",
    parsing: "Анализ...",
    intake_error: "Не удалось распознать детали. Попробуйте перефразировать запрос.",
    intake_system_instruction: "Ты — ассистент по учету инструментов в строительной компании. \
        Твоя задача — преобразовать запрос пользователя в структурированный JSON-объект. \
        Извлеки название инструмента, его уникальный инвентарный номер, описание (если есть), \
        кому он выдан (currentHolder) и где находится (currentLocation).",
};

impl Language {
    /// String table for this language
    pub fn strings(&self) -> &'static Translations {
        match self {
            Language::En => &EN,
            Language::Ru => &RU,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ru" | "russian" => Ok(Language::Ru),
            _ => Err(format!("unsupported language '{}' (expected en or ru)", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_titles() {
        let en = Language::En.strings();
        assert_eq!(en.status_title(ToolStatus::InStock), "In Stock");
        assert_eq!(en.status_title(ToolStatus::InRepair), "In Repair");

        let ru = Language::Ru.strings();
        assert_eq!(ru.status_title(ToolStatus::Issued), "Выдано");
    }

    #[test]
    fn test_instructions_differ_per_language() {
        assert_ne!(
            Language::En.strings().intake_system_instruction,
            Language::Ru.strings().intake_system_instruction
        );
        assert!(Language::En.strings().intake_system_instruction.contains("currentHolder"));
        assert!(Language::Ru.strings().intake_system_instruction.contains("currentLocation"));
    }

    #[test]
    fn test_language_parse_and_display() {
        assert_eq!("RU".parse::<Language>().unwrap(), Language::Ru);
        assert_eq!("english".parse::<Language>().unwrap(), Language::En);
        assert!("de".parse::<Language>().is_err());
        assert_eq!(Language::Ru.to_string(), "ru");
    }

    #[test]
    fn test_language_serialization() {
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
        let lang: Language = serde_json::from_str("\"ru\"").unwrap();
        assert_eq!(lang, Language::Ru);
    }
}
