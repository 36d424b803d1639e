//! Registry tests and the scripted loader shared with other test modules.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::*;
use crate::core::Size;
use crate::fault::TextReportRenderer;
use crate::view::widgets::{Layout, Widget};
use crate::view::{RootObject, Window};

/// What a scripted unit does when executed.
#[derive(Clone)]
pub(crate) enum Script {
    /// Defines `MainWindow`, a window with a label per entry plus a layout.
    App {
        title: String,
        size: Size,
        labels: Vec<String>,
    },
    /// Defines `MainWindow`, whose construction faults with this message.
    ConstructFault(String),
    /// Execution itself faults.
    ExecuteFault(Fault),
    /// Defines a report renderer titled with this string.
    Renderer(String),
    /// Defines nothing.
    Empty,
}

impl Script {
    pub(crate) fn app(title: &str) -> Self {
        Self::App {
            title: title.to_string(),
            size: Size::new(1080, 720),
            labels: vec!["Hello!".to_string()],
        }
    }
}

#[derive(Default)]
struct ScriptState {
    units: Vec<(UnitName, Origin)>,
    scripts: FxHashMap<UnitName, Script>,
    executed: Vec<UnitName>,
}

/// In-memory loader whose units can be rewritten between reloads.
#[derive(Clone, Default)]
pub(crate) struct ScriptedLoader {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedLoader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a discoverable unit.
    pub(crate) fn unit(self, name: &str, origin: Origin, script: Script) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.units.push((UnitName::from(name), origin));
            state.scripts.insert(UnitName::from(name), script);
        }
        self
    }

    /// Replace the script of an existing unit ("edit the file").
    pub(crate) fn set(&self, name: &str, script: Script) {
        self.state
            .borrow_mut()
            .scripts
            .insert(UnitName::from(name), script);
    }

    /// Units executed so far, in order.
    pub(crate) fn executed(&self) -> Vec<UnitName> {
        self.state.borrow().executed.clone()
    }

    pub(crate) fn clear_log(&self) {
        self.state.borrow_mut().executed.clear();
    }
}

impl UnitLoader for ScriptedLoader {
    fn execute(&self, name: &UnitName, _origin: &Origin) -> Result<Definitions, Fault> {
        let script = {
            let mut state = self.state.borrow_mut();
            state.executed.push(name.clone());
            state.scripts.get(name).cloned().unwrap_or(Script::Empty)
        };

        let mut definitions = Definitions::new();
        match script {
            Script::App {
                title,
                size,
                labels,
            } => {
                definitions.define_constructor(
                    "MainWindow",
                    Rc::new(move || {
                        let mut window = Window::new("MainWindow")
                            .with_title(title.clone())
                            .with_min_size(Size::new(600, 400))
                            .with_size(size);
                        let root = window.root_node();
                        window.add_child(root, Box::new(Layout::vertical()));
                        for label in &labels {
                            window.add_child(root, Box::new(Widget::label(label.clone())));
                        }
                        Ok(Box::new(window) as Box<dyn RootObject>)
                    }),
                );
            }
            Script::ConstructFault(message) => {
                definitions.define_constructor(
                    "MainWindow",
                    Rc::new(move || Err(Fault::user("RuntimeError", message.clone()))),
                );
            }
            Script::ExecuteFault(fault) => return Err(fault),
            Script::Renderer(title) => {
                definitions.define_renderer(
                    "render",
                    Rc::new(TextReportRenderer {
                        title,
                        ..TextReportRenderer::default()
                    }),
                );
            }
            Script::Empty => {}
        }
        Ok(definitions)
    }

    fn discover(&self) -> Vec<(UnitName, Origin)> {
        self.state.borrow().units.clone()
    }
}

pub(crate) fn user(path: &str) -> Origin {
    Origin::File(PathBuf::from("/home/me/app").join(path))
}

pub(crate) fn roots() -> PlatformRoots {
    PlatformRoots::new("/opt/hotshell", "/opt/hotshell/lib")
}

/// Entry, widgets, report and one app unit.
pub(crate) fn app_loader() -> ScriptedLoader {
    ScriptedLoader::new()
        .unit("__entry__", user("hotshell.toml"), Script::Empty)
        .unit("widgets", Origin::Synthetic, Script::Empty)
        .unit("report", Origin::Synthetic, Script::Renderer("Error".into()))
        .unit("window", user("window.toml"), Script::app("My app"))
}

#[test]
fn test_import_discovered_keeps_order() {
    let loader = app_loader();
    let mut registry = CodeUnitRegistry::new(Box::new(loader.clone()));

    assert_eq!(registry.import_discovered().unwrap(), 4);
    let names: Vec<_> = registry.units().iter().map(|u| u.name().as_str()).collect();
    assert_eq!(names, vec!["__entry__", "widgets", "report", "window"]);

    // second import is a no-op
    assert_eq!(registry.import_discovered().unwrap(), 0);
    assert_eq!(loader.executed().len(), 4);
}

#[test]
fn test_reload_replaces_definitions_in_place() {
    let loader = app_loader();
    let mut registry = CodeUnitRegistry::new(Box::new(loader.clone()));
    registry.import_discovered().unwrap();

    let before = registry.constructor("window", "MainWindow").unwrap();
    assert_eq!(before().unwrap().title(), "My app");

    loader.set("window", Script::app("Edited"));
    registry.reload(&UnitName::from("window")).unwrap();

    let unit = registry.get("window").unwrap();
    assert_eq!(unit.generation(), 1);
    assert_eq!(unit.origin(), &user("window.toml"));
    let after = registry.constructor("window", "MainWindow").unwrap();
    assert_eq!(after().unwrap().title(), "Edited");
    assert_eq!(registry.len(), 4);
}

#[test]
fn test_failed_reload_keeps_previous_definitions() {
    let loader = app_loader();
    let mut registry = CodeUnitRegistry::new(Box::new(loader.clone()));
    registry.import_discovered().unwrap();

    loader.set(
        "window",
        Script::ExecuteFault(Fault::user("NameError", "name 'x' is not defined")),
    );
    let fault = registry.reload(&UnitName::from("window")).unwrap_err();

    assert_eq!(fault.message(), "name 'x' is not defined");
    assert_eq!(fault.trace().frames()[0].function, "<reload window>");
    let unit = registry.get("window").unwrap();
    assert_eq!(unit.generation(), 0);
    assert!(unit.definitions().constructor("MainWindow").is_some());
}

#[test]
fn test_reload_unknown_unit() {
    let mut registry = CodeUnitRegistry::new(Box::new(ScriptedLoader::new()));
    let fault = registry.reload(&UnitName::from("ghost")).unwrap_err();
    assert_eq!(fault.type_name(), "UnitNotFound");
}

#[test]
fn test_registry_classify() {
    let mut registry = CodeUnitRegistry::new(Box::new(app_loader()));
    registry.import_discovered().unwrap();

    let classification = registry.classify(&roots());
    assert_eq!(
        classification.platform,
        vec![UnitName::from("widgets"), UnitName::from("report")]
    );
    assert_eq!(
        classification.reload_set(&UnitName::from("__entry__")),
        vec![UnitName::from("window")]
    );
}

#[test]
fn test_renderer_lookup() {
    let mut registry = CodeUnitRegistry::new(Box::new(app_loader()));
    registry.import_discovered().unwrap();

    assert!(registry.get("report").unwrap().definitions().renderer().is_some());
    assert!(registry.get("window").unwrap().definitions().renderer().is_none());
}
