//! Game Session
//!
//! One open save together with its static data. The session owns both views
//! built from the documents and every search run against them:
//!
//! - **Game Data**: `Game Data` → `Save` / `Static Data` folders → one
//!   `DataFile` per document, materialised to the configured depths
//! - **Solar System**: the orbital hierarchy built from the celestial-bodies
//!   document and the save's vessel, player and object arrays, with docked
//!   ships rehydrated under their targets
//!
//! Documents are handed over already parsed; the session performs no I/O.
//! Opening either completes or returns an error, never a partial session.

use crate::config::ExplorerConfig;
use crate::models::{Node, NodeId, NodeKind, SourceRef};
use crate::services::docking_resolver::{rehydrate_docked_ships, DockingReport};
use crate::services::error::SessionError;
use crate::services::json_materializer::JsonTreeMaterializer;
use crate::services::orbital_builder::{BuildReport, OrbitalGraphBuilder, RecordSet, SolarSystem};
use crate::services::search::{SearchFlags, SearchOperator};
use crate::tree::{NodeTree, TreeError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const GAME_DATA_ROOT_NAME: &str = "Game Data";
pub const SAVE_FOLDER_NAME: &str = "Save";
pub const STATIC_DATA_FOLDER_NAME: &str = "Static Data";

/// Which folder a document belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCategory {
    Save,
    StaticData,
}

/// A parsed input document, or the message of its load failure.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub category: SourceCategory,
    pub value: Result<Arc<Value>, String>,
}

impl SourceDocument {
    pub fn loaded(name: impl Into<String>, category: SourceCategory, value: Value) -> Self {
        Self {
            name: name.into(),
            category,
            value: Ok(Arc::new(value)),
        }
    }

    pub fn failed(
        name: impl Into<String>,
        category: SourceCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            value: Err(message.into()),
        }
    }

    /// The parsed document, or `SourceUnavailable`.
    fn document(&self) -> Result<&Arc<Value>, SessionError> {
        self.value
            .as_ref()
            .map_err(|message| SessionError::source_unavailable(&self.name, message))
    }
}

/// Documents a session is opened from.
#[derive(Debug, Clone)]
pub struct SessionSources {
    pub save: SourceDocument,
    pub static_data: Vec<SourceDocument>,
}

impl SessionSources {
    pub fn new(save: SourceDocument) -> Self {
        Self {
            save,
            static_data: Vec::new(),
        }
    }

    pub fn with_static(mut self, document: SourceDocument) -> Self {
        self.static_data.push(document);
        self
    }

    fn static_document(&self, name: &str) -> Option<&SourceDocument> {
        self.static_data.iter().find(|doc| doc.name == name)
    }
}

/// The two views of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    GameData,
    SolarSystem,
}

/// A saved search and the view it runs against.
#[derive(Debug)]
struct SavedSearch {
    view: View,
    operator: SearchOperator,
}

/// An open save with its views and searches.
#[derive(Debug)]
pub struct GameSession {
    config: ExplorerConfig,
    game_data: NodeTree,
    game_data_root: NodeId,
    solar_system: SolarSystem,
    docking: DockingReport,
    find: Option<SavedSearch>,
    saved_searches: BTreeMap<usize, SavedSearch>,
    next_search_id: usize,
}

impl GameSession {
    /// Build both views from `sources`.
    ///
    /// # Errors
    ///
    /// - `Config` if `config` does not validate
    /// - `SourceUnavailable` if the save or celestial-bodies document failed
    ///   to load, `MissingSource` if the latter was not supplied
    /// - `Hierarchy` for any orbital build or docking failure
    /// - `Tree` if a Game Data file node cannot take over its content
    ///
    /// Static documents other than celestial bodies may fail to load; they
    /// appear as `LoadError` nodes in the Game Data view.
    pub fn open(config: ExplorerConfig, sources: SessionSources) -> Result<Self, SessionError> {
        config.validate()?;

        let (game_data, game_data_root) = build_game_data(&config, &sources)?;
        let (solar_system, docking) = build_solar_system(&config, &sources)?;

        tracing::info!(
            "Opened session for '{}': {} game data node(s), {} solar system node(s)",
            sources.save.name,
            game_data.descendant_count(game_data_root),
            solar_system.tree.descendant_count(solar_system.root)
        );

        Ok(Self {
            config,
            game_data,
            game_data_root,
            solar_system,
            docking,
            find: None,
            saved_searches: BTreeMap::new(),
            next_search_id: 1,
        })
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn tree(&self, view: View) -> &NodeTree {
        match view {
            View::GameData => &self.game_data,
            View::SolarSystem => &self.solar_system.tree,
        }
    }

    pub fn root(&self, view: View) -> NodeId {
        match view {
            View::GameData => self.game_data_root,
            View::SolarSystem => self.solar_system.root,
        }
    }

    /// Records the solar-system build could not place.
    pub fn build_report(&self) -> &BuildReport {
        &self.solar_system.report
    }

    pub fn docking_report(&self) -> DockingReport {
        self.docking
    }

    /// Expand a placeholder in `view` by the configured expansion depth.
    pub fn expand(&mut self, view: View, node: NodeId) -> Result<Vec<NodeId>, SessionError> {
        let budget = self.config.expansion_depth;
        let tree = match view {
            View::GameData => &mut self.game_data,
            View::SolarSystem => &mut self.solar_system.tree,
        };
        Ok(JsonTreeMaterializer::expand(tree, node, budget)?)
    }

    /// Run the persistent "Find" search over a whole view with the
    /// configured default flags.
    pub fn find(&mut self, view: View, query: &str) -> Result<&SearchOperator, SessionError> {
        let root = self.root(view);
        let flags = self.config.search;
        let find = self.find.get_or_insert_with(|| SavedSearch {
            view,
            operator: SearchOperator::new(root, flags),
        });
        if find.view != view {
            *find = SavedSearch {
                view,
                operator: SearchOperator::new(root, flags),
            };
        }

        find.operator.set_query(query);
        let tree = match view {
            View::GameData => &self.game_data,
            View::SolarSystem => &self.solar_system.tree,
        };
        find.operator.execute(tree)?;
        Ok(&find.operator)
    }

    /// The last "Find" search, if any.
    pub fn find_operator(&self) -> Option<&SearchOperator> {
        self.find.as_ref().map(|find| &find.operator)
    }

    /// Register a saved search starting at `start` in `view`.
    ///
    /// Returns its id. The search is not executed yet.
    pub fn add_saved_search(
        &mut self,
        view: View,
        start: NodeId,
        query: impl Into<String>,
        flags: SearchFlags,
    ) -> usize {
        let id = self.next_search_id;
        self.next_search_id += 1;
        self.saved_searches.insert(
            id,
            SavedSearch {
                view,
                operator: SearchOperator::with_query(start, flags, query),
            },
        );
        tracing::debug!("Added saved search {}", id);
        id
    }

    /// (Re-)execute a saved search against the current state of its view.
    pub fn execute_search(&mut self, id: usize) -> Result<&SearchOperator, SessionError> {
        let search = self
            .saved_searches
            .get_mut(&id)
            .ok_or(SessionError::UnknownSearch { id })?;
        let tree = match search.view {
            View::GameData => &self.game_data,
            View::SolarSystem => &self.solar_system.tree,
        };
        search.operator.execute(tree)?;
        Ok(&search.operator)
    }

    pub fn saved_search(&self, id: usize) -> Option<&SearchOperator> {
        self.saved_searches.get(&id).map(|search| &search.operator)
    }

    /// Ids of all saved searches, oldest first.
    pub fn saved_search_ids(&self) -> Vec<usize> {
        self.saved_searches.keys().copied().collect()
    }

    pub fn remove_saved_search(&mut self, id: usize) -> Result<SearchOperator, SessionError> {
        self.saved_searches
            .remove(&id)
            .map(|search| search.operator)
            .ok_or(SessionError::UnknownSearch { id })
    }
}

/// Game Data view: folders and one `DataFile` per document.
fn build_game_data(
    config: &ExplorerConfig,
    sources: &SessionSources,
) -> Result<(NodeTree, NodeId), SessionError> {
    let mut tree = NodeTree::new();
    let root = tree.add_node(Node::new(NodeKind::Root, GAME_DATA_ROOT_NAME));
    let save_folder = tree.push_new_child(root, Node::new(NodeKind::DataFolder, SAVE_FOLDER_NAME));
    let static_folder =
        tree.push_new_child(root, Node::new(NodeKind::DataFolder, STATIC_DATA_FOLDER_NAME));

    add_data_file(
        &mut tree,
        save_folder,
        &sources.save,
        config.save_depth,
        config.collapse_arrays,
    )?;
    for document in &sources.static_data {
        let folder = match document.category {
            SourceCategory::Save => save_folder,
            SourceCategory::StaticData => static_folder,
        };
        add_data_file(
            &mut tree,
            folder,
            document,
            config.static_data_depth,
            config.collapse_arrays,
        )?;
    }

    Ok((tree, root))
}

/// Materialise one document under `folder`.
///
/// The `DataFile` node takes the place of the document's top-level value;
/// failed or empty documents become a `LoadError` node.
fn add_data_file(
    tree: &mut NodeTree,
    folder: NodeId,
    document: &SourceDocument,
    max_depth: usize,
    collapse_arrays: bool,
) -> Result<(), TreeError> {
    let value = match &document.value {
        Ok(value) => Arc::clone(value),
        Err(message) => {
            tracing::warn!("Document '{}' failed to load: {}", document.name, message);
            let error = JsonTreeMaterializer::error_node(tree, &document.name, message);
            tree.attach_fresh(folder, error);
            return Ok(());
        }
    };

    let source = SourceRef::root(value);
    let Some(content) =
        JsonTreeMaterializer::build(tree, &source, max_depth, 0, &document.name, collapse_arrays)
    else {
        let error = JsonTreeMaterializer::error_node(tree, &document.name, "document is empty");
        tree.attach_fresh(folder, error);
        return Ok(());
    };

    let display_text = tree.node(content).display_text().to_string();
    let file = tree.push_new_child(
        folder,
        Node::new(NodeKind::DataFile, document.name.as_str())
            .with_display_text(display_text)
            .with_tooltip(document.name.as_str())
            .with_source(source),
    );
    // The emptied top-level value node stays behind as a detached root.
    for child in tree.children(content).to_vec() {
        tree.reparent(child, file)?;
    }
    Ok(())
}

/// Solar System view, docked ships rehydrated.
fn build_solar_system(
    config: &ExplorerConfig,
    sources: &SessionSources,
) -> Result<(SolarSystem, DockingReport), SessionError> {
    let layout = &config.sources;
    let celestial = sources
        .static_document(&layout.celestial_bodies)
        .ok_or_else(|| SessionError::missing_source(&layout.celestial_bodies))?;
    let celestial = RecordSet::new(
        celestial.name.as_str(),
        SourceRef::root(Arc::clone(celestial.document()?)),
    );
    let save = sources.save.document()?;

    let builder = OrbitalGraphBuilder::new(config.max_celestial_depth);
    let mut system = builder.build_solar_system(
        &celestial,
        &save_records(save, "Ships", &layout.ships),
        &save_records(save, "Asteroids", &layout.asteroids),
        &save_records(save, "Players", &layout.players),
    )?;
    builder.attach_dynamic_objects(
        &mut system,
        &save_records(save, "DynamicObjects", &layout.dynamic_objects),
    )?;

    let docking = rehydrate_docked_ships(&mut system.tree, system.root)?;
    Ok((system, docking))
}

/// Record set at `pointer` in the save. An empty pointer disables the set.
fn save_records(save: &Arc<Value>, name: &str, pointer: &str) -> RecordSet {
    if pointer.is_empty() {
        return RecordSet::empty(name);
    }
    RecordSet::new(name, SourceRef::new(Arc::clone(save), pointer))
}

