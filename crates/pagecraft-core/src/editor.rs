//! Editing session: the document, its history and the live interaction state.

use crate::config::EditorConfig;
use crate::document::{DocumentPatch, DocumentState, PresetId, TextStylePreset};
use crate::elements::{ElementId, ElementPatch, FloatingElement};
use crate::history::History;
use crate::interaction::{DragMode, InteractionController, InteractionEvent};
use crate::surface::{ContentSync, FormatCommand, TextSurface};
use crate::table::{TableData, TableEdit};
use crate::view::{Presentation, ViewScale};
use chrono::NaiveDate;
use kurbo::Point;

/// Content of a freshly inserted text box.
pub const NEW_TEXT_BOX_CONTENT: &str = "New Dynamic Text Box";

/// A single editing session.
///
/// Owns the document and everything that changes it. All transitions are
/// synchronous; a committed change records the document as it was before
/// the change so that [`Editor::undo`] restores it.
#[derive(Debug)]
pub struct Editor {
    document: DocumentState,
    history: History<DocumentState>,
    interaction: InteractionController,
    presentation: Presentation,
    content_sync: ContentSync,
    /// Document as it was when the current drag started.
    drag_snapshot: Option<DocumentState>,
    /// Bumped on every change, committed or not.
    revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Editor {
    /// Create a session on the default document.
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_document(DocumentState::default(), config)
    }

    /// Create a session on an existing document.
    pub fn with_document(document: DocumentState, config: &EditorConfig) -> Self {
        Self {
            document,
            history: History::with_limit(config.history_limit),
            interaction: InteractionController::new(),
            presentation: Presentation::default(),
            content_sync: ContentSync::new(),
            drag_snapshot: None,
            revision: 0,
        }
    }

    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    pub fn history(&self) -> &History<DocumentState> {
        &self.history
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- View ---

    pub fn view_scale(&self) -> ViewScale {
        self.presentation.view_scale
    }

    pub fn set_view_scale(&mut self, scale: ViewScale) {
        self.presentation.view_scale = scale;
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn set_presentation(&mut self, presentation: Presentation) {
        self.presentation = presentation;
    }

    /// Fit the page into `available_width` screen pixels.
    pub fn fit_to_width(&mut self, available_width: f64) -> ViewScale {
        let scale = ViewScale::fit(available_width, self.document.page_size_px().width);
        self.presentation.view_scale = scale;
        scale
    }

    // --- Document updates ---

    /// Merge `patch` into the document, recording the prior state first
    /// when `commit` is set.
    pub fn apply(&mut self, patch: DocumentPatch, commit: bool) {
        if commit {
            self.commit_if(|doc| {
                doc.apply_patch(patch.clone());
                true
            });
        } else {
            if let Some(snapshot) = self.drag_snapshot.as_mut() {
                snapshot.apply_patch(patch.clone());
            }
            self.document.apply_patch(patch);
            self.touch();
        }
        self.reconcile_selection();
    }

    /// Record the current document without changing it. Used before the
    /// text surface mutates the content on its own.
    ///
    /// During a drag the document from before the drag is recorded instead.
    pub fn checkpoint(&mut self) {
        let prior = self.drag_snapshot.clone().unwrap_or_else(|| self.document.clone());
        self.history.commit(prior);
        log::debug!("Checkpoint, {} undo states", self.history.undo_len());
    }

    /// Run `change` on the document and commit the prior state if it
    /// reports a change.
    ///
    /// During a drag the prior state is the pre-drag snapshot, and `change`
    /// is replayed onto that snapshot so the drag still commits on its own
    /// at pointer up. Live drag geometry never reaches history.
    fn commit_if(&mut self, mut change: impl FnMut(&mut DocumentState) -> bool) -> bool {
        let prior = match &self.drag_snapshot {
            Some(snapshot) => snapshot.clone(),
            None => self.document.clone(),
        };
        if !change(&mut self.document) {
            return false;
        }
        if let Some(snapshot) = self.drag_snapshot.as_mut() {
            change(snapshot);
        }
        self.history.commit(prior);
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Restore the previous committed state.
    pub fn undo(&mut self) -> bool {
        self.abandon_drag();
        match self.history.undo(self.document.clone()) {
            Some(previous) => {
                self.document = previous;
                self.reconcile_selection();
                self.touch();
                log::info!("Undo ({} left)", self.history.undo_len());
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone state.
    pub fn redo(&mut self) -> bool {
        self.abandon_drag();
        match self.history.redo(self.document.clone()) {
            Some(next) => {
                self.document = next;
                self.reconcile_selection();
                self.touch();
                log::info!("Redo ({} left)", self.history.redo_len());
                true
            }
            None => false,
        }
    }

    /// Drop the selection if it points at an element that no longer exists.
    fn reconcile_selection(&mut self) {
        if let Some(id) = self.interaction.selection() {
            if !self.document.elements.contains(id) {
                self.interaction.element_deleted(id);
            }
        }
    }

    // --- Selection ---

    pub fn selection(&self) -> Option<ElementId> {
        self.interaction.selection()
    }

    pub fn selected_element(&self) -> Option<&FloatingElement> {
        self.selection().and_then(|id| self.document.elements.get(id))
    }

    /// Select an element. Returns false if it does not exist.
    pub fn select(&mut self, id: ElementId) -> bool {
        if self.document.elements.contains(id) {
            self.interaction.select(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.interaction.clear_selection();
    }

    /// Click on the page background or the text body.
    pub fn click_empty_canvas(&mut self) {
        if !self.interaction.is_dragging() {
            self.interaction.clear_selection();
        }
    }

    /// Topmost element under a page-local screen point.
    pub fn element_at_screen(&self, pointer: Point) -> Option<ElementId> {
        self.document.elements.element_at(self.view_scale().screen_to_doc(pointer))
    }

    // --- Element actions ---

    /// Insert the default text box.
    pub fn insert_text_box(&mut self) -> ElementId {
        self.insert_element(FloatingElement::text_box(NEW_TEXT_BOX_CONTENT))
    }

    /// Insert an image from a source (usually a data URL).
    pub fn insert_image(&mut self, source: impl Into<String>) -> ElementId {
        self.insert_element(FloatingElement::image(source))
    }

    /// Insert the default 2x2 table.
    pub fn insert_table(&mut self) -> ElementId {
        self.insert_element(FloatingElement::table(TableData::default()))
    }

    /// Insert a prepared element as a committed change.
    pub fn insert_element(&mut self, mut element: FloatingElement) -> ElementId {
        if self.document.elements.contains(element.id()) {
            element.regenerate_id();
        }
        let id = element.id();
        self.commit_if(|doc| {
            doc.elements.insert(element.clone());
            true
        });
        log::info!("Inserted element {}", id);
        id
    }

    /// Delete an element, clearing the selection if it pointed at it.
    pub fn delete_element(&mut self, id: ElementId) -> bool {
        let deleted = self.commit_if(|doc| doc.elements.delete_by_id(id).is_some());
        if deleted {
            self.interaction.element_deleted(id);
            if self.drag_snapshot.is_some() && !self.interaction.is_dragging() {
                self.drag_snapshot = None;
            }
            log::info!("Deleted element {}", id);
        }
        deleted
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selection() {
            Some(id) => self.delete_element(id),
            None => false,
        }
    }

    /// Committed property change on one element.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        self.commit_if(|doc| doc.elements.update_by_id(id, patch))
    }

    /// Move the selected element up or down the layer order.
    pub fn reorder_selected(&mut self, delta: i32) -> bool {
        let Some(id) = self.selection() else {
            return false;
        };
        self.commit_if(|doc| doc.elements.reorder_z(id, delta))
    }

    /// Committed grid edit on a table element. Refused edits record nothing.
    pub fn edit_table(&mut self, id: ElementId, edit: TableEdit) -> bool {
        self.commit_if(|doc| doc.elements.edit_table(id, edit.clone()))
    }

    // --- Pointer ---

    /// Start moving, resizing or rotating an element. `pointer` is in
    /// page-local screen space.
    pub fn pointer_down(&mut self, id: ElementId, mode: DragMode, pointer: Point) -> bool {
        let Some(element) = self.document.elements.get(id) else {
            log::debug!("pointer_down on missing element {}", id);
            return false;
        };
        self.interaction.pointer_down(element, mode, pointer);
        self.drag_snapshot = Some(self.document.clone());
        true
    }

    /// Live update while dragging. Nothing is recorded in history.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        match self.interaction.pointer_move(pointer, self.view_scale().get()) {
            Some(InteractionEvent::ElementUpdated { id, patch }) => {
                let updated = self.document.elements.update_by_id(id, &patch);
                if updated {
                    self.touch();
                }
                updated
            }
            _ => false,
        }
    }

    /// Finish the gesture. Records one history entry holding the document
    /// from before the drag, unless the element did not change.
    pub fn pointer_up(&mut self) -> bool {
        let snapshot = self.drag_snapshot.take();
        let Some(InteractionEvent::ElementCommitted { id, origin }) = self.interaction.pointer_up()
        else {
            return false;
        };
        let changed = self
            .document
            .elements
            .get(id)
            .is_some_and(|element| element.geometry() != origin);
        match snapshot {
            Some(prior) if changed => {
                self.history.commit(prior);
                log::info!("Committed drag of {}", id);
                true
            }
            _ => false,
        }
    }

    /// Abandon the gesture, putting the element back where it started.
    pub fn cancel_drag(&mut self) -> bool {
        self.drag_snapshot = None;
        match self.interaction.cancel() {
            Some(InteractionEvent::ElementRestored { id, patch }) => {
                let restored = self.document.elements.update_by_id(id, &patch);
                if restored {
                    self.touch();
                }
                restored
            }
            _ => false,
        }
    }

    /// Undo/redo replace the whole document; an open gesture on the old one
    /// is meaningless.
    fn abandon_drag(&mut self) {
        self.drag_snapshot = None;
        self.interaction.reset_drag();
    }

    // --- Text surface ---

    /// Run a formatting command on the surface as a committed change.
    pub fn format(&mut self, surface: &mut dyn TextSurface, command: &FormatCommand) {
        self.checkpoint();
        surface.execute(command);
        self.content_changed(&surface.content());
    }

    /// The surface reported new markup (typing). Not recorded in history.
    pub fn content_changed(&mut self, markup: &str) {
        self.content_sync.observe(markup);
        if let Some(snapshot) = self.drag_snapshot.as_mut() {
            snapshot.content.clear();
            snapshot.content.push_str(markup);
        }
        if self.document.content != markup {
            self.document.content = markup.to_string();
            self.touch();
        }
    }

    /// Push the document markup to the surface if it changed since the last
    /// sync (after undo, redo, reset or load).
    pub fn sync_surface(&mut self, surface: &mut dyn TextSurface) -> bool {
        self.content_sync.sync(surface, &self.document.content)
    }

    /// Wrap the surface selection in a single CSS declaration.
    pub fn apply_custom_style(
        &mut self,
        surface: &mut dyn TextSurface,
        property: &str,
        value: &str,
    ) -> bool {
        match surface.selected_text().filter(|text| !text.is_empty()) {
            Some(text) => {
                self.format(surface, &FormatCommand::custom_style(property, value, &text));
                true
            }
            None => false,
        }
    }

    /// Insert today's date (or any `date`) at the caret.
    pub fn insert_date(&mut self, surface: &mut dyn TextSurface, date: NaiveDate) {
        self.format(surface, &FormatCommand::date(date));
    }

    /// Insert a signature line at the caret.
    pub fn insert_signature(&mut self, surface: &mut dyn TextSurface) {
        self.format(surface, &FormatCommand::signature());
    }

    // --- Presets ---

    pub fn save_preset(&mut self, preset: TextStylePreset) -> PresetId {
        let id = preset.id;
        self.commit_if(|doc| {
            doc.add_preset(preset.clone());
            true
        });
        id
    }

    pub fn delete_preset(&mut self, id: PresetId) -> bool {
        self.commit_if(|doc| doc.remove_preset(id))
    }

    /// Stamp a preset onto the surface selection. Needs a non-empty selection.
    pub fn apply_preset(&mut self, surface: &mut dyn TextSurface, id: PresetId) -> bool {
        let Some(preset) = self.document.preset(id) else {
            log::debug!("apply_preset: no preset {}", id);
            return false;
        };
        let Some(text) = surface.selected_text().filter(|text| !text.is_empty()) else {
            return false;
        };
        let markup = preset.wrap(&text);
        self.format(surface, &FormatCommand::InsertHtml(markup));
        true
    }

    // --- Session ---

    /// Back to the default document with empty history and no selection.
    pub fn reset(&mut self) {
        self.document = DocumentState::default();
        self.history.clear();
        self.interaction = InteractionController::new();
        self.drag_snapshot = None;
        self.content_sync.invalidate();
        self.touch();
        log::info!("Document reset");
    }

    /// Replace the document wholesale (after loading), dropping history.
    pub fn load(&mut self, document: DocumentState) {
        self.document = document;
        self.history.clear();
        self.interaction = InteractionController::new();
        self.drag_snapshot = None;
        self.content_sync.invalidate();
        self.touch();
    }

    /// Clear selection chrome and any open gesture before capturing the page.
    pub fn prepare_export(&mut self) {
        self.cancel_drag();
        self.interaction.clear_selection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::NumericField;
    use crate::table::GridEnd;

    /// Surface that appends inserted markup and treats everything else as a no-op.
    #[derive(Default)]
    struct FakeSurface {
        markup: String,
        selection: Option<String>,
        writes: usize,
    }

    impl TextSurface for FakeSurface {
        fn execute(&mut self, command: &FormatCommand) {
            match command {
                FormatCommand::InsertHtml(html) => self.markup.push_str(html),
                FormatCommand::Bold => self.markup = format!("<b>{}</b>", self.markup),
                _ => {}
            }
        }

        fn content(&self) -> String {
            self.markup.clone()
        }

        fn set_content(&mut self, markup: &str) {
            self.markup = markup.to_string();
            self.writes += 1;
        }

        fn selected_text(&self) -> Option<String> {
            self.selection.clone()
        }
    }

    fn blank_editor() -> Editor {
        Editor::with_document(DocumentState::blank(), &EditorConfig::default())
    }

    #[test]
    fn test_drag_scenario_single_history_entry() {
        let mut editor = blank_editor();
        let id = editor.insert_element(FloatingElement::text_box("x"));
        let undo_before = editor.history().undo_len();
        let before_drag = editor.document().clone();

        assert!(editor.pointer_down(id, DragMode::Move, Point::new(500.0, 500.0)));
        assert!(editor.pointer_move(Point::new(520.0, 510.0)));
        assert!(editor.pointer_move(Point::new(550.0, 530.0)));
        assert_eq!(editor.history().undo_len(), undo_before);
        assert!(editor.pointer_up());

        let el = editor.document().elements.get(id).unwrap();
        assert_eq!(el.position, Point::new(150.0, 130.0));
        assert_eq!(editor.history().undo_len(), undo_before + 1);

        assert!(editor.undo());
        assert_eq!(editor.document(), &before_drag);
    }

    #[test]
    fn test_drag_under_view_scale() {
        let mut editor = blank_editor();
        editor.set_view_scale(ViewScale::new(0.5));
        let id = editor.insert_element(FloatingElement::text_box("x"));
        editor.pointer_down(id, DragMode::Resize, Point::new(0.0, 0.0));
        editor.pointer_move(Point::new(-500.0, 25.0));
        editor.pointer_up();
        let el = editor.document().elements.get(id).unwrap();
        assert_eq!((el.width, el.height), (20.0, 130.0));
    }

    #[test]
    fn test_click_without_movement_records_nothing() {
        let mut editor = blank_editor();
        let id = editor.insert_element(FloatingElement::text_box("x"));
        let undo_before = editor.history().undo_len();
        editor.pointer_down(id, DragMode::Move, Point::new(10.0, 10.0));
        assert!(!editor.pointer_up());
        assert_eq!(editor.history().undo_len(), undo_before);
        assert_eq!(editor.selection(), Some(id));
    }

    #[test]
    fn test_pointer_up_twice_is_noop() {
        let mut editor = blank_editor();
        let id = editor.insert_element(FloatingElement::text_box("x"));
        editor.pointer_down(id, DragMode::Move, Point::ZERO);
        editor.pointer_move(Point::new(5.0, 5.0));
        assert!(editor.pointer_up());
        let undo_len = editor.history().undo_len();
        assert!(!editor.pointer_up());
        assert_eq!(editor.history().undo_len(), undo_len);
    }

    #[test]
    fn test_delete_during_drag_abandons_commit() {
        let mut editor = blank_editor();
        let id = editor.insert_element(FloatingElement::text_box("x"));
        editor.pointer_down(id, DragMode::Move, Point::ZERO);
        editor.pointer_move(Point::new(40.0, 0.0));
        assert!(editor.delete_element(id));
        let undo_len = editor.history().undo_len();
        assert!(!editor.pointer_up());
        assert_eq!(editor.history().undo_len(), undo_len);
        assert_eq!(editor.selection(), None);
    }

    #[test]
    fn test_commit_mid_drag_keeps_drag_separate() {
        let mut editor = blank_editor();
        let a = editor.insert_element(FloatingElement::text_box("a"));
        let b = editor.insert_element(FloatingElement::text_box("b"));
        let a_x = |editor: &Editor| editor.document().elements.get(a).map(|e| e.position.x);

        editor.pointer_down(a, DragMode::Move, Point::ZERO);
        editor.pointer_move(Point::new(50.0, 0.0));
        assert!(editor.delete_element(b));
        editor.pointer_move(Point::new(100.0, 0.0));
        assert!(editor.pointer_up());
        assert_eq!(a_x(&editor), Some(200.0));

        // The drag undoes first and leaves the deletion in place.
        assert!(editor.undo());
        assert_eq!(a_x(&editor), Some(100.0));
        assert!(!editor.document().elements.contains(b));

        // Then the deletion, with `a` at its pre-drag position.
        assert!(editor.undo());
        assert_eq!(a_x(&editor), Some(100.0));
        assert!(editor.document().elements.contains(b));

        assert!(editor.undo());
        assert!(!editor.document().elements.contains(b));
        assert_eq!(a_x(&editor), Some(100.0));
    }

    #[test]
    fn test_undo_delete_of_dragged_element_restores_pre_drag_geometry() {
        let mut editor = blank_editor();
        let id = editor.insert_element(FloatingElement::text_box("x"));
        editor.pointer_down(id, DragMode::Move, Point::ZERO);
        editor.pointer_move(Point::new(40.0, 25.0));
        assert!(editor.delete_element(id));
        assert!(!editor.pointer_up());

        assert!(editor.undo());
        let el = editor.document().elements.get(id).unwrap();
        assert_eq!(el.position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_typing_during_drag_survives_drag_undo() {
        let mut editor = blank_editor();
        let id = editor.insert_element(FloatingElement::text_box("x"));
        editor.pointer_down(id, DragMode::Move, Point::ZERO);
        editor.pointer_move(Point::new(10.0, 0.0));
        editor.content_changed("<p>typed</p>");
        assert!(editor.pointer_up());

        assert!(editor.undo());
        assert_eq!(editor.document().content, "<p>typed</p>");
        assert_eq!(editor.document().elements.get(id).unwrap().position.x, 100.0);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut editor = blank_editor();
        let id = editor.insert_text_box();
        assert!(editor.select(id));
        assert!(editor.delete_selected());
        assert_eq!(editor.selection(), None);
        assert!(editor.document().elements.is_empty());
        assert!(!editor.delete_element(id));
    }

    #[test]
    fn test_undo_reconciles_selection() {
        let mut editor = blank_editor();
        let id = editor.insert_text_box();
        editor.select(id);
        assert!(editor.undo());
        assert!(editor.document().elements.is_empty());
        assert_eq!(editor.selection(), None);
        assert!(editor.redo());
        assert!(editor.document().elements.contains(id));
    }

    #[test]
    fn test_committed_apply_clears_redo() {
        let mut editor = blank_editor();
        editor.apply(DocumentPatch::title("one"), true);
        editor.apply(DocumentPatch::title("two"), true);
        assert!(editor.undo());
        assert!(editor.can_redo());
        editor.apply(DocumentPatch::margin(10.0), true);
        assert!(!editor.can_redo());
        assert_eq!(editor.document().title, "one");
    }

    #[test]
    fn test_uncommitted_apply_skips_history() {
        let mut editor = blank_editor();
        editor.apply(DocumentPatch::content("<p>typing</p>"), false);
        assert!(!editor.can_undo());
        assert_eq!(editor.document().content, "<p>typing</p>");
    }

    #[test]
    fn test_update_element_from_input() {
        let mut editor = blank_editor();
        let id = editor.insert_text_box();
        assert!(editor.update_element(id, &ElementPatch::from_input(NumericField::Width, "oops")));
        assert_eq!(editor.document().elements.get(id).unwrap().width, 20.0);
        assert!(!editor.update_element(uuid::Uuid::new_v4(), &ElementPatch::rotation(5.0)));
        assert!(!editor.update_element(id, &ElementPatch::default()));
    }

    #[test]
    fn test_reorder_selected() {
        let mut editor = blank_editor();
        let id = editor.insert_text_box();
        assert!(!editor.reorder_selected(1));
        editor.select(id);
        assert!(editor.reorder_selected(-3));
        assert_eq!(editor.selected_element().unwrap().z_index, 0);
    }

    #[test]
    fn test_refused_table_edit_records_nothing() {
        let mut editor = blank_editor();
        let id = editor.insert_table();
        assert!(editor.edit_table(id, TableEdit::RemoveColumn));
        let undo_len = editor.history().undo_len();
        assert!(!editor.edit_table(id, TableEdit::RemoveColumn));
        assert_eq!(editor.history().undo_len(), undo_len);
        assert!(editor.edit_table(id, TableEdit::InsertRow(GridEnd::Start)));
        assert_eq!(editor.document().elements.get(id).unwrap().height, 180.0);
    }

    #[test]
    fn test_format_checkpoints_and_reads_back() {
        let mut editor = blank_editor();
        let mut surface = FakeSurface { markup: "hi".into(), ..Default::default() };
        editor.format(&mut surface, &FormatCommand::Bold);
        assert_eq!(editor.document().content, "<b>hi</b>");
        assert!(editor.undo());
        assert_eq!(editor.document().content, "");

        assert!(editor.sync_surface(&mut surface));
        assert_eq!(surface.markup, "");
    }

    #[test]
    fn test_sync_surface_skips_echo() {
        let mut editor = blank_editor();
        let mut surface = FakeSurface::default();
        editor.content_changed("<p>typed</p>");
        surface.markup = "<p>typed</p>".into();
        assert!(!editor.sync_surface(&mut surface));
        assert_eq!(surface.writes, 0);
    }

    #[test]
    fn test_insert_date_and_signature() {
        let mut editor = blank_editor();
        let mut surface = FakeSurface::default();
        editor.insert_date(&mut surface, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(editor.document().content, "<span>October 17, 2026</span>");

        editor.insert_signature(&mut surface);
        assert!(editor.document().content.ends_with(">Signature</div>"));
        assert!(editor.undo());
        assert_eq!(editor.document().content, "<span>October 17, 2026</span>");
    }

    #[test]
    fn test_apply_preset_needs_selection() {
        let mut editor = blank_editor();
        let preset = TextStylePreset::new("Big", "serif", "40px", "900", "#000");
        let id = editor.save_preset(preset);
        let mut surface = FakeSurface::default();

        assert!(!editor.apply_preset(&mut surface, id));
        surface.selection = Some("Hello".into());
        assert!(editor.apply_preset(&mut surface, id));
        assert!(editor.document().content.contains("font-size: 40px"));
        assert!(editor.document().content.contains(">Hello</span>"));

        assert!(editor.delete_preset(id));
        assert!(!editor.apply_preset(&mut surface, id));
    }

    #[test]
    fn test_custom_style() {
        let mut editor = blank_editor();
        let mut surface = FakeSurface { selection: Some("abc".into()), ..Default::default() };
        assert!(editor.apply_custom_style(&mut surface, "text-transform", "uppercase"));
        assert_eq!(
            editor.document().content,
            "<span style=\"text-transform: uppercase\">abc</span>"
        );
    }

    #[test]
    fn test_reset() {
        let mut editor = blank_editor();
        let id = editor.insert_text_box();
        editor.select(id);
        editor.reset();
        let default = DocumentState::default();
        assert_eq!(editor.document().title, default.title);
        assert_eq!(editor.document().content, default.content);
        assert_eq!(editor.document().elements.len(), 1);
        assert!(!editor.document().elements.contains(id));
        assert!(!editor.can_undo());
        assert_eq!(editor.selection(), None);
    }

    #[test]
    fn test_prepare_export_restores_drag() {
        let mut editor = blank_editor();
        let id = editor.insert_text_box();
        editor.pointer_down(id, DragMode::Move, Point::ZERO);
        editor.pointer_move(Point::new(300.0, 300.0));
        editor.prepare_export();
        assert_eq!(editor.selection(), None);
        assert!(!editor.interaction().is_dragging());
        assert_eq!(editor.document().elements.get(id).unwrap().position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut editor = blank_editor();
        let start = editor.revision();
        editor.content_changed("");
        assert_eq!(editor.revision(), start);
        editor.content_changed("x");
        assert!(editor.revision() > start);
    }

    #[test]
    fn test_fit_to_width() {
        let mut editor = blank_editor();
        let scale = editor.fit_to_width(400.0);
        assert!(scale.get() < 1.0 && scale.get() > 0.0);
        assert_eq!(editor.fit_to_width(5000.0).get(), 1.0);
    }
}
