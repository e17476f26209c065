use sash_core::{AreaAction, ContextTarget, DocumentHost, Menu, MenuGroup, MenuItem, Orientation};

use crate::area::EditorArea;

pub const SPLIT_GROUP: &str = "split";
pub const COLLAPSE_GROUP: &str = "collapse";

fn item(id: &str, name: &str, action: AreaAction) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        action,
    }
}

impl<H: DocumentHost> EditorArea<H> {
    /// Add the split/collapse entries that apply to `target`. Groups the
    /// menu already has are left alone, so building twice adds nothing.
    pub fn build_context_menu(&self, target: ContextTarget, menu: &mut dyn Menu) {
        let container = match target {
            ContextTarget::Container(container) => container,
            ContextTarget::Document(document) => match self.container_of_document(document) {
                Some(container) => container,
                None => return,
            },
        };
        let Some(node) = self.layout.leaf_of(container) else {
            return;
        };

        if !self.layout.is_empty(node) && !menu.find_group(SPLIT_GROUP) {
            menu.append_group(MenuGroup {
                id: SPLIT_GROUP.to_string(),
                items: vec![
                    item(
                        "split_hor",
                        "Split horizontally",
                        AreaAction::Split {
                            container,
                            orientation: Orientation::Horizontal,
                        },
                    ),
                    item(
                        "split_ver",
                        "Split vertically",
                        AreaAction::Split {
                            container,
                            orientation: Orientation::Vertical,
                        },
                    ),
                ],
            });
        }

        if self.layout.is_collapsible(node) && !menu.find_group(COLLAPSE_GROUP) {
            menu.append_group(MenuGroup {
                id: COLLAPSE_GROUP.to_string(),
                items: vec![item("merge", "Collapse split", AreaAction::Collapse { container })],
            });
        }
    }

    /// Run a menu action. Returns whether the tree changed.
    pub fn perform(&mut self, action: AreaAction) -> bool {
        match action {
            AreaAction::Split {
                container,
                orientation,
            } => match self.split_container(container, orientation) {
                Ok(_) => true,
                Err(err) => {
                    log::warn!("split failed: {err}");
                    false
                }
            },
            AreaAction::Collapse { container } => self.collapse_container(container),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_host::MemoryHost;

    fn group_ids(menu: &[MenuGroup]) -> Vec<&str> {
        menu.iter().map(|g| g.id.as_str()).collect()
    }

    #[test]
    fn empty_root_gets_no_entries() {
        let area = EditorArea::new(MemoryHost::new());
        let mut menu: Vec<MenuGroup> = Vec::new();
        area.build_context_menu(ContextTarget::Container(area.active_container()), &mut menu);
        assert!(menu.is_empty());
    }

    #[test]
    fn document_menu_offers_split_only_on_root() {
        let mut area = EditorArea::new(MemoryHost::new());
        let a = area.host_mut().create("a.py");
        area.add_document(a).unwrap();

        let mut menu: Vec<MenuGroup> = Vec::new();
        area.build_context_menu(ContextTarget::Document(a), &mut menu);
        assert_eq!(group_ids(&menu), vec![SPLIT_GROUP]);
        let names: Vec<_> = menu[0].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Split horizontally", "Split vertically"]);
    }

    #[test]
    fn building_twice_adds_nothing() {
        let mut area = EditorArea::new(MemoryHost::new());
        let a = area.host_mut().create("a.py");
        area.add_document(a).unwrap();
        let left = area.active_container();
        area.split_container(left, sash_core::Orientation::Horizontal).unwrap();

        let mut menu: Vec<MenuGroup> = Vec::new();
        area.build_context_menu(ContextTarget::Container(left), &mut menu);
        area.build_context_menu(ContextTarget::Container(left), &mut menu);
        assert_eq!(group_ids(&menu), vec![SPLIT_GROUP, COLLAPSE_GROUP]);
        assert_eq!(menu[1].items[0].id, "merge");
    }

    #[test]
    fn actions_split_and_collapse() {
        let mut area = EditorArea::new(MemoryHost::new());
        let a = area.host_mut().create("a.py");
        area.add_document(a).unwrap();
        let left = area.active_container();

        let mut menu: Vec<MenuGroup> = Vec::new();
        area.build_context_menu(ContextTarget::Container(left), &mut menu);
        assert!(area.perform(menu[0].items[1].action));
        let root = area.layout().root();
        assert!(!area.layout().is_leaf(root));

        let mut menu: Vec<MenuGroup> = Vec::new();
        area.build_context_menu(ContextTarget::Container(left), &mut menu);
        let collapse = menu.iter().find(|g| g.id == COLLAPSE_GROUP).unwrap();
        assert!(area.perform(collapse.items[0].action));
        assert!(area.layout().is_leaf(area.layout().root()));
        assert_eq!(area.layout().documents(), vec![a]);
    }

    #[test]
    fn split_of_unknown_container_fails() {
        let mut area: EditorArea<MemoryHost> = EditorArea::new(MemoryHost::new());
        assert!(!area.perform(AreaAction::Split {
            container: sash_core::ContainerId(999),
            orientation: Orientation::Horizontal,
        }));
    }
}
