//! Application state
//!
//! `App` owns everything a front end needs: the visible tool collection,
//! the selected language, the active store and the intake parser. Front
//! ends mutate it only through the named operations below, each of which
//! talks to the store first and touches the visible collection only on
//! success.

use std::sync::Arc;

use crate::domain::{Direction, Tool, ToolData, ToolStatus};
use crate::error::{Result, ToolTrackError};
use crate::i18n::Language;
use crate::intake::IntakeParser;
use crate::lifecycle;
use crate::storage::{LANGUAGE_KEY, LocalStorage, ToolStore};

/// One board column
#[derive(Debug)]
pub struct Column<'a> {
    pub status: ToolStatus,
    pub title: &'static str,
    pub tools: Vec<&'a Tool>,
}

/// Explicit application state
pub struct App {
    store: Arc<dyn ToolStore>,
    prefs: LocalStorage,
    intake: Option<IntakeParser>,
    tools: Vec<Tool>,
    language: Language,
}

impl App {
    /// Create the state with an empty collection; call `load` to fill it.
    ///
    /// The language comes from `prefs`, falling back to English.
    pub fn new(store: Arc<dyn ToolStore>, prefs: LocalStorage) -> Self {
        let language = load_language(&prefs);
        Self {
            store,
            prefs,
            intake: None,
            tools: Vec::new(),
            language,
        }
    }

    /// Use `language` unless a choice is already stored
    pub fn with_default_language(mut self, language: Language) -> Self {
        if matches!(self.prefs.get_item(LANGUAGE_KEY), Ok(None)) {
            self.language = language;
        }
        self
    }

    /// Attach the natural-language intake parser
    pub fn with_intake(mut self, intake: IntakeParser) -> Self {
        self.intake = Some(intake);
        self
    }

    /// Refresh the visible collection from the store
    ///
    /// Failures are logged and leave an empty collection.
    pub async fn load(&mut self) {
        self.tools = match self.store.list().await {
            Ok(tools) => tools,
            Err(e) => {
                log::error!("Failed to load tools: {}", e);
                Vec::new()
            }
        };
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn get(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language and persist the choice
    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.prefs.set_item(LANGUAGE_KEY, language.code())?;
        self.language = language;
        Ok(())
    }

    /// Create a tool from form data; it lands at the top of the collection
    pub async fn create(&mut self, data: ToolData) -> Result<Tool> {
        let tool = self
            .store
            .create(data)
            .await
            .inspect_err(|e| log::error!("Failed to create tool: {}", e))?;
        self.tools.insert(0, tool.clone());
        Ok(tool)
    }

    /// Replace a tool with an edited version (any field may change)
    pub async fn update(&mut self, tool: Tool) -> Result<Tool> {
        let updated = self
            .store
            .update(&tool)
            .await
            .inspect_err(|e| log::error!("Failed to update tool {}: {}", tool.id, e))?;
        self.replace(updated.clone());
        Ok(updated)
    }

    /// Delete a tool
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.store
            .delete(id)
            .await
            .inspect_err(|e| log::error!("Failed to delete tool {}: {}", id, e))?;
        self.tools.retain(|t| t.id != id);
        Ok(())
    }

    /// Move a tool one step along its lifecycle
    ///
    /// Returns the tool as it stands afterwards; a no-op move returns it
    /// unchanged without a store round trip.
    pub async fn move_tool(&mut self, id: &str, direction: Direction) -> Result<Tool> {
        let tool = self
            .get(id)
            .cloned()
            .ok_or_else(|| ToolTrackError::ToolNotFound(id.to_string()))?;

        let moved = lifecycle::move_tool(self.store.as_ref(), &tool, direction)
            .await
            .inspect_err(|e| log::error!("Failed to move tool {}: {}", id, e))?;
        match moved {
            Some(updated) => {
                self.replace(updated.clone());
                Ok(updated)
            }
            None => Ok(tool),
        }
    }

    /// Parse free text into a tool and create it
    ///
    /// Intake failures surface as the localized intake message; nothing is
    /// saved unless parsing fully succeeds.
    pub async fn add_from_prompt(&mut self, prompt: &str) -> Result<Tool> {
        let intake = self
            .intake
            .as_ref()
            .ok_or_else(|| ToolTrackError::Config("natural-language intake is not configured".to_string()))?;
        let data = intake.parse(prompt, self.language).await?;
        self.create(data).await
    }

    /// Tools grouped by status with localized titles, in board order
    pub fn columns(&self) -> Vec<Column<'_>> {
        let strings = self.language.strings();
        ToolStatus::ALL
            .iter()
            .map(|&status| Column {
                status,
                title: strings.status_title(status),
                tools: self.tools.iter().filter(|t| t.status == status).collect(),
            })
            .collect()
    }

    fn replace(&mut self, tool: Tool) {
        if let Some(slot) = self.tools.iter_mut().find(|t| t.id == tool.id) {
            *slot = tool;
        }
    }
}

fn load_language(prefs: &LocalStorage) -> Language {
    match prefs.get_item(LANGUAGE_KEY) {
        Ok(Some(code)) => code.parse().unwrap_or_else(|e| {
            log::warn!("Ignoring stored language: {}", e);
            Language::default()
        }),
        Ok(None) => Language::default(),
        Err(e) => {
            log::error!("Could not read language preference: {}", e);
            Language::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use crate::storage::LocalToolStore;
    use tempfile::TempDir;

    fn create_test_app(llm_response: &str) -> (App, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let prefs = LocalStorage::new(temp_dir.path()).unwrap();
        let store = Arc::new(LocalToolStore::open(prefs.clone()));
        let intake = IntakeParser::new(Arc::new(MockLlmClient::new(llm_response)));
        (App::new(store, prefs).with_intake(intake), temp_dir)
    }

    #[tokio::test]
    async fn test_create_and_columns() {
        let (mut app, _temp) = create_test_app("{}");

        let drill = app.create(ToolData::new("Drill", "H78-B")).await.unwrap();
        let saw = app.create(ToolData::new("Saw", "S-1")).await.unwrap();
        app.move_tool(&saw.id, Direction::Forward).await.unwrap();

        let columns = app.columns();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].title, "In Stock");
        assert_eq!(columns[0].tools.len(), 1);
        assert_eq!(columns[0].tools[0].id, drill.id);
        assert_eq!(columns[1].tools[0].id, saw.id);
        assert!(columns[2].tools.is_empty());
    }

    #[tokio::test]
    async fn test_move_unknown_tool() {
        let (mut app, _temp) = create_test_app("{}");
        let result = app.move_tool("missing", Direction::Forward).await;
        assert!(matches!(result, Err(ToolTrackError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_update_leaves_state() {
        let (mut app, _temp) = create_test_app("{}");
        let tool = app.create(ToolData::new("Drill", "H78-B")).await.unwrap();

        let mut edited = tool.clone();
        edited.name = String::new();
        assert!(app.update(edited).await.is_err());

        assert_eq!(app.tools(), &[tool]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (mut app, _temp) = create_test_app("{}");
        let tool = app.create(ToolData::new("Drill", "H78-B")).await.unwrap();

        let mut edited = tool.clone();
        edited.current_location = Some("Warehouse".to_string());
        edited.status = ToolStatus::InRepair;
        app.update(edited.clone()).await.unwrap();
        assert_eq!(app.get(&tool.id), Some(&edited));

        app.delete(&tool.id).await.unwrap();
        assert!(app.tools().is_empty());
        assert!(app.delete(&tool.id).await.is_err());
    }

    #[tokio::test]
    async fn test_add_from_prompt() {
        let (mut app, _temp) =
            create_test_app(r#"{"name":"Hammer drill","inventoryCode":"H78-B","currentHolder":"Dave"}"#);

        let tool = app.add_from_prompt("new hammer drill for Dave").await.unwrap();

        assert_eq!(tool.status, ToolStatus::InStock);
        assert_eq!(tool.current_holder.as_deref(), Some("Dave"));
        assert_eq!(app.tools()[0].id, tool.id);
    }

    #[tokio::test]
    async fn test_add_from_prompt_without_intake() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = LocalStorage::new(temp_dir.path()).unwrap();
        let store = Arc::new(LocalToolStore::open(prefs.clone()));
        let mut app = App::new(store, prefs);

        let result = app.add_from_prompt("a drill").await;
        assert!(matches!(result, Err(ToolTrackError::Config(_))));
    }

    #[tokio::test]
    async fn test_language_persists() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = LocalStorage::new(temp_dir.path()).unwrap();
        let store: Arc<dyn ToolStore> = Arc::new(LocalToolStore::open(prefs.clone()));

        let mut app = App::new(store.clone(), prefs.clone());
        assert_eq!(app.language(), Language::En);
        app.set_language(Language::Ru).unwrap();
        assert_eq!(app.columns()[0].title, "На складе");

        let app = App::new(store, prefs);
        assert_eq!(app.language(), Language::Ru);
    }

    #[tokio::test]
    async fn test_default_language_yields_to_stored_choice() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = LocalStorage::new(temp_dir.path()).unwrap();
        let store: Arc<dyn ToolStore> = Arc::new(LocalToolStore::open(prefs.clone()));

        let app = App::new(store.clone(), prefs.clone()).with_default_language(Language::Ru);
        assert_eq!(app.language(), Language::Ru);

        prefs.set_item(LANGUAGE_KEY, "en").unwrap();
        let app = App::new(store, prefs).with_default_language(Language::Ru);
        assert_eq!(app.language(), Language::En);
    }

    #[tokio::test]
    async fn test_garbage_language_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = LocalStorage::new(temp_dir.path()).unwrap();
        prefs.set_item(LANGUAGE_KEY, "klingon").unwrap();
        let store = Arc::new(LocalToolStore::open(prefs.clone()));

        let app = App::new(store, prefs);
        assert_eq!(app.language(), Language::En);
    }
}
