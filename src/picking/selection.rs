use crate::molecule::AtomId;

/// Hover and click selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Atom currently under the cursor.
    pub hovered: Option<AtomId>,
    /// Selected atoms in selection order.
    pub selected: Vec<AtomId>,
}

impl Selection {
    /// Empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the atom under the cursor. Returns whether it changed.
    pub fn update_hover(&mut self, hit: Option<AtomId>) -> bool {
        let changed = self.hovered != hit;
        self.hovered = hit;
        changed
    }

    /// Apply a click on `hit`. Returns whether the selection changed.
    ///
    /// Clicking empty space clears the selection, shift-click toggles the
    /// atom, and a plain click replaces the selection with it.
    pub fn handle_click(
        &mut self,
        hit: Option<AtomId>,
        shift_held: bool,
    ) -> bool {
        let Some(hit) = hit else {
            // Clicked on empty space - clear selection
            if self.selected.is_empty() {
                return false;
            }
            self.selected.clear();
            return true;
        };

        if shift_held {
            if let Some(pos) = self.selected.iter().position(|&a| a == hit) {
                let _ = self.selected.remove(pos);
            } else {
                self.selected.push(hit);
            }
        } else {
            if self.selected == [hit] {
                return false;
            }
            self.selected.clear();
            self.selected.push(hit);
        }

        true
    }

    /// Clear selection and hover.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.hovered = None;
    }

    /// Check if an atom is selected
    #[must_use]
    pub fn is_selected(&self, atom: AtomId) -> bool {
        self.selected.contains(&atom)
    }
}
