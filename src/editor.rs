//! Editor state: the pixel buffer, the active color and undo/redo history
//!
//! Every mutating operation snapshots the buffer before changing it, so a
//! single `undo()` always restores the exact pre-mutation state.

use crate::focus::{self, Direction};
use crate::grid::{Color, GridSize, PixelBuffer};
use crate::history::History;

#[derive(Debug, Clone)]
pub struct Editor {
    pixels: PixelBuffer,
    color: Color,
    history: History,
    focus: Option<usize>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(GridSize::default())
    }
}

impl Editor {
    pub fn new(size: GridSize) -> Self {
        Self {
            pixels: PixelBuffer::new(size),
            color: Color::default(),
            history: History::default(),
            focus: None,
        }
    }

    /// Editor with an explicit undo depth
    pub fn with_history_limit(size: GridSize, limit: usize) -> Self {
        Self {
            history: History::with_limit(limit),
            ..Self::new(size)
        }
    }

    /// Start from existing artwork with empty history
    pub fn from_pixels(pixels: PixelBuffer, history_limit: usize) -> Self {
        Self {
            pixels,
            color: Color::default(),
            history: History::with_limit(history_limit),
            focus: None,
        }
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn size(&self) -> GridSize {
        self.pixels.size()
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Snapshot the current buffer before a mutation
    fn checkpoint(&mut self) {
        self.history.record(self.pixels.clone());
    }

    /// Toggle-paint `index` with the active color.
    ///
    /// Panics if `index` is outside the grid.
    pub fn paint(&mut self, index: usize) {
        assert!(
            index < self.pixels.len(),
            "cell {index} outside {} grid",
            self.size().as_str()
        );
        self.checkpoint();
        self.pixels.toggle(index, &self.color);
    }

    /// Paint the focused cell, if any
    pub fn paint_focused(&mut self) -> bool {
        match self.focus {
            Some(index) => {
                self.paint(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.checkpoint();
        self.pixels.clear();
    }

    pub fn mirror_horizontal(&mut self) {
        self.checkpoint();
        self.pixels.mirror_horizontal();
    }

    /// Reallocate an empty grid. Artwork, history and focus are discarded.
    pub fn set_grid_size(&mut self, size: GridSize) {
        self.pixels = PixelBuffer::new(size);
        self.history.clear();
        self.focus = None;
    }

    /// Install a loaded design.
    ///
    /// A design of another size resizes the grid first, which drops history;
    /// otherwise the replacement can be undone.
    pub fn replace_pixels(&mut self, pixels: PixelBuffer) {
        if pixels.size() != self.size() {
            self.set_grid_size(pixels.size());
        } else {
            self.checkpoint();
        }
        self.pixels = pixels;
    }

    /// Returns false if there was nothing to undo
    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.pixels.clone()) {
            Some(previous) => {
                self.pixels = previous;
                true
            }
            None => false,
        }
    }

    /// Returns false if there was nothing to redo
    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.pixels.clone()) {
            Some(next) => {
                self.pixels = next;
                true
            }
            None => false,
        }
    }

    pub fn select_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Focus a cell; out-of-range indices clear focus
    pub fn set_focus(&mut self, index: Option<usize>) {
        self.focus = index.filter(|&i| i < self.pixels.len());
    }

    /// Move focus one cell, starting from the top-left corner if unfocused
    pub fn move_focus(&mut self, direction: Direction) -> usize {
        let next = match self.focus {
            Some(index) => focus::step(index, direction, self.size()),
            None => 0,
        };
        self.focus = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn red() -> Color {
        Color::new("#ff0000").unwrap()
    }

    #[test]
    fn test_set_grid_size_allocates_empty_buffer() {
        let mut editor = Editor::default();
        editor.paint(0);
        for size in GridSize::ALL {
            editor.set_grid_size(size);
            assert_eq!(editor.pixels().len(), size.cell_count());
            assert!(editor.pixels().is_blank());
            assert!(!editor.can_undo());
        }
    }

    #[test]
    fn test_paint_toggle_scenario() {
        let mut editor = Editor::new(GridSize::Small);
        editor.select_color(red());
        editor.paint(0);
        assert_eq!(editor.pixels().get(0), Some(&red()));
        editor.paint(0);
        assert_eq!(editor.pixels().get(0), None);
    }

    #[test]
    #[should_panic]
    fn test_paint_out_of_range_panics() {
        let mut editor = Editor::new(GridSize::Small);
        editor.paint(64);
    }

    #[test]
    fn test_select_color_has_no_history_effect() {
        let mut editor = Editor::default();
        editor.select_color(red());
        assert!(!editor.can_undo());
        assert_eq!(editor.color(), &red());
    }

    #[test]
    fn test_undo_redo_noop_when_empty() {
        let mut editor = Editor::default();
        assert!(!editor.undo());
        assert!(!editor.redo());
        assert!(editor.pixels().is_blank());
    }

    #[test]
    fn test_mutation_after_undo_clears_redo() {
        let mut editor = Editor::default();
        editor.paint(1);
        editor.undo();
        assert!(editor.can_redo());
        editor.mirror_horizontal();
        assert!(!editor.can_redo());
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut editor = Editor::default();
        editor.select_color(red());
        editor.paint(5);
        editor.paint(6);
        let painted = editor.pixels().clone();
        editor.clear();
        assert!(editor.pixels().is_blank());
        assert!(editor.undo());
        assert_eq!(editor.pixels(), &painted);
    }

    #[test]
    fn test_replace_same_size_is_undoable() {
        let mut editor = Editor::new(GridSize::Small);
        let mut design = PixelBuffer::new(GridSize::Small);
        design.set(10, Some(red()));
        editor.replace_pixels(design.clone());
        assert_eq!(editor.pixels(), &design);
        assert!(editor.undo());
        assert!(editor.pixels().is_blank());
    }

    #[test]
    fn test_replace_other_size_resizes_and_drops_history() {
        let mut editor = Editor::new(GridSize::Small);
        editor.paint(0);
        let design = PixelBuffer::new(GridSize::Large);
        editor.replace_pixels(design);
        assert_eq!(editor.size(), GridSize::Large);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_focus_navigation_and_paint() {
        let mut editor = Editor::new(GridSize::Small);
        assert!(!editor.paint_focused());
        assert_eq!(editor.move_focus(Direction::Right), 0);
        assert_eq!(editor.move_focus(Direction::Right), 1);
        assert_eq!(editor.move_focus(Direction::Down), 9);
        assert!(editor.paint_focused());
        assert!(editor.pixels().get(9).is_some());
        editor.set_focus(Some(500));
        assert_eq!(editor.focus(), None);
    }

    #[derive(Debug, Clone)]
    enum Action {
        Paint(usize),
        Clear,
        Mirror,
    }

    fn any_action() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0usize..1024).prop_map(Action::Paint),
            Just(Action::Clear),
            Just(Action::Mirror),
        ]
    }

    fn apply(editor: &mut Editor, action: &Action) {
        match action {
            Action::Paint(i) => editor.paint(i % editor.pixels().len()),
            Action::Clear => editor.clear(),
            Action::Mirror => editor.mirror_horizontal(),
        }
    }

    proptest! {
        #[test]
        fn prop_undo_restores_and_redo_reapplies(
            size in prop::sample::select(GridSize::ALL.to_vec()),
            setup in prop::collection::vec(any_action(), 0..20),
            last in any_action(),
        ) {
            let mut editor = Editor::new(size);
            editor.select_color(Color::new("#336699").unwrap());
            for action in &setup {
                apply(&mut editor, action);
            }
            let before = editor.pixels().clone();
            apply(&mut editor, &last);
            let after = editor.pixels().clone();

            prop_assert!(editor.undo());
            prop_assert_eq!(editor.pixels(), &before);
            prop_assert!(editor.redo());
            prop_assert_eq!(editor.pixels(), &after);
        }
    }
}
