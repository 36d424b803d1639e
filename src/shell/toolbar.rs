//! Shell toolbar actions and their key shortcuts.

use std::fmt;

/// A developer action exposed by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    HardRestart,
    SoftReload,
    DumpGeometry,
    DumpObjectTree,
}

impl Action {
    pub const ALL: [Self; 4] = [
        Self::HardRestart,
        Self::SoftReload,
        Self::DumpGeometry,
        Self::DumpObjectTree,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::HardRestart => "Hard restart",
            Self::SoftReload => "Soft reload",
            Self::DumpGeometry => "Dump geometry",
            Self::DumpObjectTree => "Dump object tree",
        }
    }

    /// Bound key shortcut, if any.
    pub fn shortcut(self) -> Option<Shortcut> {
        match self {
            Self::HardRestart => Some(Shortcut::ctrl('r')),
            Self::DumpObjectTree => Some(Shortcut::ctrl('d')),
            _ => None,
        }
    }

    /// Action bound to `shortcut`.
    pub fn for_shortcut(shortcut: Shortcut) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.shortcut() == Some(shortcut))
    }
}

/// A `Ctrl+<key>` chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    key: char,
}

impl Shortcut {
    pub const fn ctrl(key: char) -> Self {
        Self {
            key: key.to_ascii_lowercase(),
        }
    }

    /// Parse `ctrl+r`, `Ctrl+R`, `^r`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let key = if let Some(rest) = text.strip_prefix('^') {
            rest
        } else {
            let (modifier, key) = text.split_once('+')?;
            if !modifier.eq_ignore_ascii_case("ctrl") {
                return None;
            }
            key
        };

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Some(Self::ctrl(c)),
            _ => None,
        }
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ctrl+{}", self.key.to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarItem {
    Action(Action),
    Separator,
}

/// The shell's action strip.
#[derive(Debug, Clone)]
pub struct Toolbar {
    items: Vec<ToolbarItem>,
}

impl Default for Toolbar {
    fn default() -> Self {
        Self {
            items: vec![
                ToolbarItem::Action(Action::HardRestart),
                ToolbarItem::Action(Action::SoftReload),
                ToolbarItem::Separator,
                ToolbarItem::Action(Action::DumpGeometry),
                ToolbarItem::Action(Action::DumpObjectTree),
            ],
        }
    }
}

impl Toolbar {
    #[cfg(test)]
    pub fn items(&self) -> &[ToolbarItem] {
        &self.items
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.items.iter().filter_map(|item| match item {
            ToolbarItem::Action(action) => Some(*action),
            ToolbarItem::Separator => None,
        })
    }

    /// One line per action, with its shortcut.
    pub fn help(&self) -> String {
        self.actions()
            .map(|action| match action.shortcut() {
                Some(shortcut) => format!("{} ({shortcut})", action.label()),
                None => action.label().to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
