//! Sidebar menu tree.

use crate::navigation::{MenuAction, PageId};

/// One row of the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Text shown in the sidebar.
    pub label: &'static str,
    /// Leaf action or nested entries.
    pub node: MenuNode,
}

/// Content of a menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    /// Selecting the row performs the action.
    Item(MenuAction),
    /// Expandable group.
    Group(Vec<MenuEntry>),
}

impl MenuEntry {
    fn item(label: &'static str, action: MenuAction) -> Self {
        Self {
            label,
            node: MenuNode::Item(action),
        }
    }

    fn page(label: &'static str, id: &'static str) -> Self {
        Self::item(label, MenuAction::Navigate(PageId::known(id)))
    }

    /// Action of a leaf row.
    #[must_use]
    pub fn action(&self) -> Option<&MenuAction> {
        match &self.node {
            MenuNode::Item(action) => Some(action),
            MenuNode::Group(_) => None,
        }
    }
}

/// The application menu.
#[must_use]
pub fn main_menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry::item("Home", MenuAction::ShowHome),
        MenuEntry::page("Search", "search"),
        MenuEntry {
            label: "Cycles",
            node: MenuNode::Group(vec![
                MenuEntry::page("Cycles", "cycles"),
                MenuEntry::page("Sortie", "sortie"),
                MenuEntry::page("Archon Hunt", "archon"),
                MenuEntry::page("Arbitration", "arbitration"),
                MenuEntry::page("Nightwave", "nightwave"),
                MenuEntry::page("Void Fissures", "fissures"),
                MenuEntry::page("Baro Ki'Teer", "baro"),
            ]),
        },
        MenuEntry::page("Events", "events"),
        MenuEntry::page("Git Update Info", "info_git"),
    ]
}

/// Every leaf action in display order.
#[must_use]
pub fn actions(entries: &[MenuEntry]) -> Vec<&MenuAction> {
    entries
        .iter()
        .flat_map(|entry| match &entry.node {
            MenuNode::Item(action) => vec![action],
            MenuNode::Group(children) => actions(children),
        })
        .collect()
}
