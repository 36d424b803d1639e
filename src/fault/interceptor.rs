//! Fault interception.
//!
//! The interceptor owns the Normal -> Faulted transition: it renders a
//! fault with the report unit's current renderer and puts the report into
//! the shell. While installed it also captures panics so the host loop can
//! route them here.

use std::rc::Rc;

use super::panic::{self, PanicHook};
use super::{Fault, ReportRenderer, ReportView, TextReportRenderer};
use crate::logger;
use crate::registry::{CodeUnitRegistry, UnitName};
use crate::shell::Shell;
use crate::view::RootObject;

pub struct FaultInterceptor {
    renderer_unit: UnitName,
    fallback: Rc<dyn ReportRenderer>,
    previous_hook: Option<PanicHook>,
    faults: usize,
}

impl FaultInterceptor {
    /// Interceptor rendering with the renderer defined by `renderer_unit`.
    pub fn new(renderer_unit: impl Into<UnitName>) -> Self {
        Self {
            renderer_unit: renderer_unit.into(),
            fallback: Rc::new(TextReportRenderer::default()),
            previous_hook: None,
            faults: 0,
        }
    }

    /// Install the panic-capturing hook. Idempotent.
    pub fn install(&mut self) {
        if self.previous_hook.is_none() {
            self.previous_hook = Some(panic::install_hook());
            crate::debug!("fault"; "interceptor installed");
        }
    }

    /// Restore the hook that was active before [`install`](Self::install).
    pub fn uninstall(&mut self) {
        if let Some(previous) = self.previous_hook.take() {
            panic::restore_hook(previous);
            crate::debug!("fault"; "interceptor removed");
        }
    }

    #[cfg(test)]
    pub fn is_installed(&self) -> bool {
        self.previous_hook.is_some()
    }

    /// Faults intercepted so far.
    #[cfg(test)]
    pub fn faults(&self) -> usize {
        self.faults
    }

    #[cfg(test)]
    pub fn renderer_unit(&self) -> &UnitName {
        &self.renderer_unit
    }

    /// The report unit's renderer, or the built-in one if it defines none.
    pub fn renderer(&self, registry: &CodeUnitRegistry) -> Rc<dyn ReportRenderer> {
        registry
            .get(self.renderer_unit.as_str())
            .and_then(|unit| unit.definitions().renderer())
            .unwrap_or_else(|| Rc::clone(&self.fallback))
    }

    /// Replace the shell's content with a report of `fault`.
    ///
    /// The report keeps the shell's current size where its limits allow.
    pub fn intercept(&mut self, fault: &Fault, shell: &mut Shell, registry: &CodeUnitRegistry) {
        self.faults += 1;
        let mut view = self.renderer(registry).render(fault);
        let (summary, detail) = status_lines(fault, &view);
        logger::status_error(&summary, &detail);

        view.resize(shell.frame().size);
        shell.show_report(view);
        shell.reapply_transfer();
    }
}

/// Console summary and full report text for an intercepted fault.
fn status_lines(fault: &Fault, view: &ReportView) -> (String, String) {
    (fault.to_string(), view.text().trim_end().to_string())
}

impl Drop for FaultInterceptor {
    fn drop(&mut self) {
        self.uninstall();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Point, Size};
    use crate::fault::{Frame, SourceLocation};
    use crate::registry::tests::{Script, app_loader};
    use crate::shell::{ShellSettings, ShellState};
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> (CodeUnitRegistry, Shell) {
        let loader = app_loader();
        let mut registry = CodeUnitRegistry::new(Box::new(loader));
        registry.import_discovered().unwrap();

        let root = registry.constructor("window", "MainWindow").unwrap()().unwrap();
        let settings = ShellSettings {
            position_file: dir.path().join("window_position.json"),
            ..ShellSettings::default()
        };
        (registry, Shell::new(settings, root))
    }

    #[test]
    fn test_intercept_shows_report_and_keeps_geometry() {
        let dir = TempDir::new().unwrap();
        let (registry, mut shell) = setup(&dir);
        shell.move_to(Point::new(100, 200));
        let before = shell.frame_geometry();

        let mut interceptor = FaultInterceptor::new("report");
        let fault = Fault::user("RuntimeError", "boom")
            .with_frame(Frame::new("MainWindow").at(SourceLocation::new("window.toml", 3, 1)));
        interceptor.intercept(&fault, &mut shell, &registry);

        assert_eq!(shell.state(), ShellState::Faulted);
        assert!(shell.frame().visible);
        assert_eq!(shell.frame_geometry(), before);
        assert_eq!(interceptor.faults(), 1);

        let crate::shell::Content::Report(view) = shell.content() else {
            panic!("expected report content");
        };
        assert!(view.text().contains("boom"));
        assert!(view.report().trace.contains("MainWindow"));
    }

    #[test]
    fn test_report_respects_minimum_size() {
        let dir = TempDir::new().unwrap();
        let (registry, mut shell) = setup(&dir);
        assert_eq!(shell.frame().size, Size::new(1080, 720));

        let mut interceptor = FaultInterceptor::new("report");
        interceptor.intercept(&Fault::user("RuntimeError", "boom"), &mut shell, &registry);

        // 720 already satisfies the 700 minimum height.
        assert_eq!(shell.frame().size, Size::new(1080, 720));
        assert_eq!(shell.frame().limits.min, Size::new(900, 700));
    }

    #[test]
    fn test_syntax_location_is_exact() {
        let dir = TempDir::new().unwrap();
        let (registry, mut shell) = setup(&dir);

        let fault = Fault::syntax("invalid syntax", SourceLocation::new("x", 10, 4))
            .with_frame(Frame::new("reload").at(SourceLocation::new("host.rs", 99, 1)));
        FaultInterceptor::new("report").intercept(&fault, &mut shell, &registry);

        let crate::shell::Content::Report(view) = shell.content() else {
            panic!("expected report content");
        };
        assert_eq!(
            view.report().location,
            Some(SourceLocation::new("x", 10, 4))
        );
    }

    #[test]
    fn test_renderer_comes_from_report_unit() {
        let dir = TempDir::new().unwrap();
        let (_, mut shell) = setup(&dir);

        let loader = app_loader();
        loader.set("report", Script::Renderer("Broken build".into()));
        let mut registry = CodeUnitRegistry::new(Box::new(loader));
        registry.import_discovered().unwrap();

        let mut interceptor = FaultInterceptor::new("report");
        interceptor.intercept(&Fault::user("RuntimeError", "boom"), &mut shell, &registry);
        assert_eq!(shell.frame().title, "Broken build");
    }

    #[test]
    fn test_missing_report_unit_falls_back() {
        let dir = TempDir::new().unwrap();
        let (registry, mut shell) = setup(&dir);

        let mut interceptor = FaultInterceptor::new("no_such_unit");
        interceptor.intercept(&Fault::user("RuntimeError", "boom"), &mut shell, &registry);
        assert_eq!(shell.frame().title, "Error");
    }

    #[test]
    fn test_console_status_carries_full_report() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("window.toml");
        std::fs::write(&source, "[[component]]\nname = \"MainWindow\"\nraise = \"boom\"\n").unwrap();

        let fault = Fault::user("RuntimeError", "boom")
            .with_frame(Frame::new("MainWindow").at(SourceLocation::new(&source, 3, 1)));
        let view = TextReportRenderer::default().render(&fault);
        let (summary, detail) = status_lines(&fault, &view);

        assert_eq!(summary, "RuntimeError: boom");
        assert!(detail.contains("raise = \"boom\""));
        assert!(detail.contains("Traceback"));
        assert!(detail.contains("in MainWindow"));
    }

    #[test]
    fn test_install_lifecycle() {
        let _hook = crate::fault::hook_lock();
        let mut interceptor = FaultInterceptor::new("report");
        assert!(!interceptor.is_installed());

        interceptor.install();
        interceptor.install();
        assert!(interceptor.is_installed());

        interceptor.uninstall();
        assert!(!interceptor.is_installed());
    }
}
