use sash_core::{DocumentHost, FocusTarget};

use crate::area::EditorArea;

impl<H: DocumentHost> EditorArea<H> {
    /// Route an application focus change. A container or its tab bar makes
    /// that container active; a document widget activates its document.
    /// Anything else is ignored. Returns whether the area state changed.
    pub fn focus_changed(&mut self, target: Option<FocusTarget>) -> bool {
        match target {
            Some(FocusTarget::Container(container)) | Some(FocusTarget::TabBar(container)) => {
                self.layout.set_active_container(container)
            }
            Some(FocusTarget::Widget(widget)) => {
                let owner = self.documents.iter().copied().find(|&id| {
                    self.host
                        .document(id)
                        .is_some_and(|doc| doc.owns_widget(widget))
                });
                match owner {
                    Some(document) => self.activate(document),
                    None => false,
                }
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_host::MemoryHost;
    use sash_core::{ContainerId, Orientation, WidgetId};

    #[test]
    fn container_and_tab_bar_focus_set_active() {
        let mut area = EditorArea::new(MemoryHost::new());
        let left = area.active_container();
        let right = area.split_container(left, Orientation::Vertical).unwrap();

        assert!(area.focus_changed(Some(FocusTarget::Container(left))));
        assert_eq!(area.active_container(), left);
        assert!(area.focus_changed(Some(FocusTarget::TabBar(right))));
        assert_eq!(area.active_container(), right);
    }

    #[test]
    fn document_widget_focus_activates_document() {
        let mut area = EditorArea::new(MemoryHost::new());
        let a = area.host_mut().create("a.py");
        let b = area.host_mut().create("b.py");
        area.add_document(a).unwrap();
        area.add_document(b).unwrap();

        let widget = area.host().widget_of(b).unwrap();
        assert!(area.focus_changed(Some(FocusTarget::Widget(widget))));
        assert_eq!(area.active_document(), Some(b));
        let active = area.active_container();
        assert_eq!(area.container(active).unwrap().current_document(), Some(b));
    }

    #[test]
    fn unrelated_focus_is_ignored() {
        let mut area = EditorArea::new(MemoryHost::new());
        let a = area.host_mut().create("a.py");
        area.add_document(a).unwrap();
        let before = area.active_container();

        assert!(!area.focus_changed(None));
        assert!(!area.focus_changed(Some(FocusTarget::Widget(WidgetId(4242)))));
        assert!(!area.focus_changed(Some(FocusTarget::Container(ContainerId(999)))));
        assert_eq!(area.active_container(), before);
        assert_eq!(area.active_document(), None);
    }
}
