//! Soft reload.
//!
//! The engine owns the code unit registry. A soft reload re-executes the
//! report unit, then every user unit except the entry unit, then builds a
//! fresh root from the main unit's constructor and hands it to the shell.
//!
//! # Modules
//!
//! - `restart` - Hard restart (process re-exec)

pub mod restart;

use crate::fault::{Fault, Frame};
use crate::logger;
use crate::registry::{CodeUnitRegistry, PlatformRoots, UnitName};
use crate::shell::{Content, Shell};
use crate::view::RootObject;

/// Units and names the engine works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadTargets {
    /// Unit exposing the root constructor.
    pub main: UnitName,
    /// Zero-argument constructor name within `main`.
    pub constructor: String,
    /// Process entry unit; never reloaded.
    pub entry: UnitName,
    /// Fault-report generator unit; reloaded first.
    pub report: UnitName,
}

impl Default for ReloadTargets {
    fn default() -> Self {
        Self {
            main: UnitName::from("window"),
            constructor: "MainWindow".to_string(),
            entry: UnitName::from("__entry__"),
            report: UnitName::from("report"),
        }
    }
}

/// Outcome of a successful soft reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    /// User units re-executed, in order.
    pub reloaded: Vec<UnitName>,
    /// Units newly imported during this pass.
    pub imported: usize,
    /// Platform units left untouched.
    pub platform: usize,
}

pub struct ReloadEngine {
    registry: CodeUnitRegistry,
    roots: PlatformRoots,
    targets: ReloadTargets,
}

impl ReloadEngine {
    pub fn new(registry: CodeUnitRegistry, roots: PlatformRoots, targets: ReloadTargets) -> Self {
        Self {
            registry,
            roots,
            targets,
        }
    }

    pub fn registry(&self) -> &CodeUnitRegistry {
        &self.registry
    }

    pub fn targets(&self) -> &ReloadTargets {
        &self.targets
    }

    /// Import every discovered unit and construct the first root.
    pub fn start(&mut self) -> Result<Box<dyn RootObject>, Fault> {
        let imported = self.registry.import_discovered()?;
        crate::debug!("reload"; "imported {} units at startup", imported);
        self.construct_root()
    }

    /// Invoke the main unit's constructor as currently defined.
    pub fn construct_root(&self) -> Result<Box<dyn RootObject>, Fault> {
        let ReloadTargets {
            main, constructor, ..
        } = &self.targets;

        let Some(ctor) = self.registry.constructor(main.as_str(), constructor) else {
            return Err(Fault::user(
                "AttributeError",
                format!("unit `{main}` has no constructor `{constructor}`"),
            ));
        };

        ctor().map_err(|fault| fault.within(Frame::new(format!("{main}.{constructor}"))))
    }

    /// Reload user code and replace the shell's content with a fresh root.
    ///
    /// A fault leaves the shell untouched; units reloaded before the fault
    /// keep their new definitions.
    pub fn soft_reload(&mut self, shell: &mut Shell) -> Result<ReloadSummary, Fault> {
        let report = self.targets.report.clone();
        if self.registry.contains(report.as_str()) {
            self.registry.reload(&report)?;
        }

        let imported = self.registry.import_discovered()?;

        let classification = self.registry.classify(&self.roots);
        let targets: Vec<UnitName> = classification
            .reload_set(&self.targets.entry)
            .into_iter()
            .filter(|name| *name != report)
            .collect();

        for name in &targets {
            self.registry.reload(name)?;
        }

        let root = self.construct_root()?;
        shell.set_content(Content::App(root));

        let summary = ReloadSummary {
            reloaded: targets,
            imported,
            platform: classification.platform.len(),
        };
        logger::status_success(&format!(
            "reloaded {} unit{}",
            summary.reloaded.len(),
            if summary.reloaded.len() == 1 { "" } else { "s" }
        ));
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Point, Size};
    use crate::fault::FaultInterceptor;
    use crate::registry::tests::{Script, ScriptedLoader, app_loader, roots, user};
    use crate::registry::Origin;
    use crate::shell::{ShellSettings, ShellState};
    use tempfile::TempDir;

    fn engine(loader: &ScriptedLoader) -> ReloadEngine {
        let registry = CodeUnitRegistry::new(Box::new(loader.clone()));
        ReloadEngine::new(registry, roots(), ReloadTargets::default())
    }

    fn shell(dir: &TempDir, root: Box<dyn RootObject>) -> Shell {
        let settings = ShellSettings {
            position_file: dir.path().join("window_position.json"),
            ..ShellSettings::default()
        };
        Shell::new(settings, root)
    }

    #[test]
    fn test_soft_reload_order() {
        let dir = TempDir::new().unwrap();
        let loader = app_loader().unit("helpers", user("helpers.toml"), Script::Empty);
        let mut engine = engine(&loader);
        let mut shell = shell(&dir, engine.start().unwrap());
        loader.clear_log();

        let summary = engine.soft_reload(&mut shell).unwrap();

        assert_eq!(
            loader.executed(),
            vec![
                UnitName::from("report"),
                UnitName::from("window"),
                UnitName::from("helpers"),
            ]
        );
        assert_eq!(
            summary.reloaded,
            vec![UnitName::from("window"), UnitName::from("helpers")]
        );
        assert_eq!(summary.platform, 2);
        assert_eq!(summary.imported, 0);
    }

    #[test]
    fn test_soft_reload_swaps_root() {
        let dir = TempDir::new().unwrap();
        let loader = app_loader();
        let mut engine = engine(&loader);
        let mut shell = shell(&dir, engine.start().unwrap());
        assert_eq!(shell.frame().title, "My app");

        loader.set("window", Script::app("Edited"));
        engine.soft_reload(&mut shell).unwrap();

        assert_eq!(shell.frame().title, "Edited");
        assert_eq!(shell.root().title(), "Edited");
        assert!(shell.root().is_parented());
    }

    #[test]
    fn test_soft_reload_is_idempotent_for_geometry() {
        let dir = TempDir::new().unwrap();
        let loader = app_loader();
        let mut engine = engine(&loader);
        let mut shell = shell(&dir, engine.start().unwrap());
        shell.move_to(Point::new(100, 200));

        engine.soft_reload(&mut shell).unwrap();
        let first = (shell.frame_geometry(), shell.frame().title.clone());
        engine.soft_reload(&mut shell).unwrap();
        let second = (shell.frame_geometry(), shell.frame().title.clone());

        assert_eq!(first, second);
        assert_eq!(first.0.origin(), Point::new(100, 200));
    }

    #[test]
    fn test_fault_then_recovery() {
        let dir = TempDir::new().unwrap();
        let loader = app_loader();
        let mut engine = engine(&loader);
        let mut shell = shell(&dir, engine.start().unwrap());
        shell.move_to(Point::new(100, 200));
        let geometry = shell.frame_geometry();
        let mut interceptor = FaultInterceptor::new("report");

        loader.set("window", Script::ConstructFault("boom".into()));
        let fault = engine.soft_reload(&mut shell).unwrap_err();
        assert_eq!(fault.message(), "boom");
        assert_eq!(fault.trace().frames()[0].function, "window.MainWindow");
        interceptor.intercept(&fault, &mut shell, engine.registry());

        assert_eq!(shell.state(), ShellState::Faulted);
        assert!(shell.frame().visible);
        assert_eq!(shell.frame_geometry(), geometry);

        loader.set("window", Script::app("My app"));
        engine.soft_reload(&mut shell).unwrap();
        assert_eq!(shell.state(), ShellState::Normal);
        assert_eq!(shell.frame_geometry(), geometry);
        assert_eq!(shell.frame().title, "My app");
    }

    #[test]
    fn test_fault_leaves_shell_content() {
        let dir = TempDir::new().unwrap();
        let loader = app_loader();
        let mut engine = engine(&loader);
        let mut shell = shell(&dir, engine.start().unwrap());

        loader.set(
            "window",
            Script::ExecuteFault(Fault::user("NameError", "undefined")),
        );
        assert!(engine.soft_reload(&mut shell).is_err());
        assert_eq!(shell.state(), ShellState::Normal);
        assert_eq!(shell.frame().title, "My app");
    }

    #[test]
    fn test_entry_and_platform_units_are_not_reloaded() {
        let dir = TempDir::new().unwrap();
        let loader = app_loader().unit(
            "json",
            Origin::File("/opt/hotshell/lib/json.toml".into()),
            Script::Empty,
        );
        let mut engine = engine(&loader);
        let mut shell = shell(&dir, engine.start().unwrap());
        loader.clear_log();

        engine.soft_reload(&mut shell).unwrap();
        let executed = loader.executed();
        assert!(!executed.contains(&UnitName::from("__entry__")));
        assert!(!executed.contains(&UnitName::from("json")));
        assert!(!executed.contains(&UnitName::from("widgets")));
    }

    #[test]
    fn test_report_reloaded_before_faulting_unit() {
        let dir = TempDir::new().unwrap();
        let loader = app_loader();
        let mut engine = engine(&loader);
        let mut shell = shell(&dir, engine.start().unwrap());
        let mut interceptor = FaultInterceptor::new("report");

        loader.set("report", Script::Renderer("Fresh report".into()));
        loader.set("window", Script::ConstructFault("boom".into()));
        let fault = engine.soft_reload(&mut shell).unwrap_err();
        interceptor.intercept(&fault, &mut shell, engine.registry());

        assert_eq!(shell.frame().title, "Fresh report");
    }

    #[test]
    fn test_missing_constructor_is_a_fault() {
        let loader = app_loader();
        let mut engine = engine(&loader);
        loader.set("window", Script::Empty);

        let fault = engine.start().err().unwrap();
        assert_eq!(fault.type_name(), "AttributeError");
        assert!(fault.message().contains("MainWindow"));
    }

    #[test]
    fn test_new_units_join_on_reload() {
        let dir = TempDir::new().unwrap();
        let loader = app_loader();
        let mut engine = engine(&loader);
        let mut shell = shell(&dir, engine.start().unwrap());

        loader.clone().unit("extra", user("extra.toml"), Script::Empty);
        let summary = engine.soft_reload(&mut shell).unwrap();
        assert_eq!(summary.imported, 1);
        assert!(engine.registry().contains("extra"));
        assert_eq!(shell.frame().size, Size::new(1080, 720));
    }
}
