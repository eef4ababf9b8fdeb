//! Pixel Nostalgia entry point
//!
//! Builds the editor UI in the browser and wires DOM events to the editor core.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, KeyboardEvent,
        MouseEvent,
    };

    use pixel_nostalgia::autosave::Autosave;
    use pixel_nostalgia::designs::{DesignLibrary, Outcome, Prompter};
    use pixel_nostalgia::error::DesignError;
    use pixel_nostalgia::export::{self, EXPORT_FILENAME, ExportStyle};
    use pixel_nostalgia::focus::GridKey;
    use pixel_nostalgia::store::LocalStorage;
    use pixel_nostalgia::{Color, Editor, GridSize, Settings};

    /// Blocking `confirm()` / `alert()` dialogs
    struct BrowserPrompter;

    impl Prompter for BrowserPrompter {
        fn confirm(&mut self, message: &str) -> bool {
            web_sys::window()
                .and_then(|w| w.confirm_with_message(message).ok())
                .unwrap_or(false)
        }

        fn notify(&mut self, message: &str) {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(message);
            }
        }
    }

    /// Editor instance holding all UI state
    struct App {
        editor: Editor,
        designs: DesignLibrary<LocalStorage>,
        autosave: Autosave<LocalStorage>,
        storage: LocalStorage,
        settings: Settings,
    }

    impl App {
        fn new(storage: LocalStorage) -> Self {
            let settings = Settings::load_from(&storage);
            let autosave = Autosave::new(storage.clone());
            let restored = if settings.autosave {
                autosave.restore(settings.grid_size)
            } else {
                None
            };
            // Restored art is the starting point, not an undo step
            let mut editor = match restored {
                Some(pixels) => Editor::from_pixels(pixels, settings.history_limit),
                None => Editor::with_history_limit(settings.grid_size, settings.history_limit),
            };
            editor.select_color(settings.color.clone());

            Self {
                editor,
                designs: DesignLibrary::new(storage.clone()),
                autosave,
                storage,
                settings,
            }
        }

        fn save_settings(&mut self) {
            if let Err(e) = self.settings.save_to(&mut self.storage) {
                log::warn!("Failed to save settings: {}", e);
            }
        }

        /// Re-render and persist after the buffer changed
        fn after_change(&mut self) {
            if self.settings.autosave {
                if let Err(e) = self.autosave.sync(self.editor.pixels()) {
                    log::warn!("Autosave failed: {}", e);
                }
            }
            self.render();
        }

        fn render(&self) {
            let Some(document) = document() else { return };
            let Some(grid) = by_id::<HtmlElement>(&document, "grid") else {
                return;
            };

            let pixels = self.editor.pixels();
            let dim = pixels.size().dim();
            if grid.child_element_count() as usize != pixels.len() {
                grid.set_inner_html("");
                let _ = grid
                    .style()
                    .set_property("grid-template-columns", &format!("repeat({dim}, 1fr)"));
                for index in 0..pixels.len() {
                    if let Ok(cell) = document.create_element("div") {
                        let _ = cell.set_attribute("data-index", &index.to_string());
                        let _ = grid.append_child(&cell);
                    }
                }
            }

            let cells = grid.children();
            for (index, color) in pixels.cells().iter().enumerate() {
                let Some(cell) = cells
                    .item(index as u32)
                    .and_then(|c| c.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                let background = color.as_ref().map(Color::as_str).unwrap_or("white");
                let _ = cell.style().set_property("background-color", background);
                let class = if self.editor.focus() == Some(index) {
                    "pixel focused"
                } else {
                    "pixel"
                };
                cell.set_class_name(class);
            }

            set_disabled(&document, "undo-btn", !self.editor.can_undo());
            set_disabled(&document, "redo-btn", !self.editor.can_redo());
            if let Some(select) = by_id::<HtmlSelectElement>(&document, "size-select") {
                select.set_value(&dim.to_string());
            }
        }

        fn refresh_design_list(&self, names: &[String]) {
            let Some(document) = document() else { return };
            let Some(select) = by_id::<HtmlSelectElement>(&document, "design-select") else {
                return;
            };
            select.set_inner_html("");
            for name in names {
                if let Ok(option) = document.create_element("option") {
                    let _ = option.set_attribute("value", name);
                    option.set_text_content(Some(name));
                    let _ = select.append_child(&option);
                }
            }
        }

        fn export(&self) {
            let result = export::encode_png(self.editor.pixels(), &ExportStyle::default())
                .and_then(|bytes| export::download_png(&bytes, EXPORT_FILENAME));
            if let Err(e) = result {
                log::error!("Export failed: {}", e);
                BrowserPrompter.notify(&format!("Export failed: {e}"));
            }
        }

        fn save_design(&mut self, name: &str) {
            match self.designs.save(name, self.editor.pixels(), &mut BrowserPrompter) {
                Ok(Outcome::Done(names)) => self.refresh_design_list(&names),
                Ok(Outcome::Cancelled) => {}
                Err(DesignError::EmptyName) => BrowserPrompter.notify("Please enter a design name."),
                Err(e) => report(e),
            }
        }

        fn load_design(&mut self, name: &str) {
            match self.designs.load(name) {
                Ok(pixels) => {
                    let resized = pixels.size() != self.editor.size();
                    self.editor.replace_pixels(pixels);
                    if resized {
                        self.settings.grid_size = self.editor.size();
                        self.save_settings();
                    }
                    self.after_change();
                }
                // Leave the current drawing untouched
                Err(DesignError::NotFound(name)) => {
                    log::info!("Design {:?} not found", name);
                    BrowserPrompter.notify(&format!("No design named \"{name}\"."));
                }
                Err(e) => report(e),
            }
        }

        fn delete_design(&mut self, name: &str) {
            match self.designs.delete(name, &mut BrowserPrompter) {
                Ok(Outcome::Done(names)) => self.refresh_design_list(&names),
                Ok(Outcome::Cancelled) => {}
                Err(e) => report(e),
            }
        }
    }

    fn report(e: DesignError) {
        log::error!("Design storage error: {}", e);
        BrowserPrompter.notify(&format!("Could not update saved designs: {e}"));
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
        document.get_element_by_id(id)?.dyn_into::<T>().ok()
    }

    fn set_disabled(document: &Document, id: &str, disabled: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if disabled {
                el.set_attribute("disabled", "")
            } else {
                el.remove_attribute("disabled")
            };
        }
    }

    fn input_value(id: &str) -> String {
        document()
            .and_then(|d| by_id::<HtmlInputElement>(&d, id))
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn select_value(id: &str) -> String {
        document()
            .and_then(|d| by_id::<HtmlSelectElement>(&d, id))
            .map(|select| select.value())
            .unwrap_or_default()
    }

    /// Attach a click handler to a button by id
    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Missing #{} element", id);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pixel Nostalgia starting...");

        let document = document().expect("no document");
        let storage = match LocalStorage::open() {
            Ok(storage) => storage,
            Err(e) => {
                log::error!("{}", e);
                BrowserPrompter.notify("Local storage is unavailable; saving is disabled.");
                return;
            }
        };

        let app = Rc::new(RefCell::new(App::new(storage)));

        {
            let app = app.borrow();
            if let Some(input) = by_id::<HtmlInputElement>(&document, "color-input") {
                input.set_value(app.editor.color().as_str());
            }
            match app.designs.list_names() {
                Ok(names) => app.refresh_design_list(&names),
                Err(e) => log::warn!("Saved designs unreadable: {}", e),
            }
            app.render();
        }

        setup_grid(&document, app.clone());
        setup_controls(&document, app.clone());
        setup_design_buttons(&document, app.clone());
        setup_keyboard(&document, app);

        log::info!("Pixel Nostalgia running!");
    }

    fn setup_grid(document: &Document, app: Rc<RefCell<App>>) {
        let Some(grid) = document.get_element_by_id("grid") else {
            log::warn!("Missing #grid element");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let index = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.get_attribute("data-index"))
                .and_then(|s| s.parse::<usize>().ok());
            let Some(index) = index else { return };

            let mut a = app.borrow_mut();
            if index < a.editor.pixels().len() {
                a.editor.set_focus(Some(index));
                a.editor.paint(index);
                a.after_change();
            }
        });
        let _ = grid.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_controls(document: &Document, app: Rc<RefCell<App>>) {
        // Color picker
        if let Some(input) = by_id::<HtmlInputElement>(document, "color-input") {
            let app = app.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                match Color::parse_hex(&input_clone.value()) {
                    Ok(color) => {
                        let mut a = app.borrow_mut();
                        a.editor.select_color(color.clone());
                        a.settings.color = color;
                        a.save_settings();
                    }
                    Err(e) => log::warn!("{}", e),
                }
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Grid size
        if let Some(select) = by_id::<HtmlSelectElement>(document, "size-select") {
            let app = app.clone();
            let select_clone = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(size) = GridSize::from_str(&select_clone.value()) else {
                    return;
                };
                let mut a = app.borrow_mut();
                if size != a.editor.size() {
                    a.editor.set_grid_size(size);
                    a.settings.grid_size = size;
                    a.save_settings();
                    a.after_change();
                    log::info!("Grid resized to {}", size.as_str());
                }
            });
            let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            on_click(document, "mirror-btn", move || {
                let mut a = app.borrow_mut();
                a.editor.mirror_horizontal();
                a.after_change();
            });
        }
        {
            let app = app.clone();
            on_click(document, "clear-btn", move || {
                let mut a = app.borrow_mut();
                a.editor.clear();
                a.after_change();
            });
        }
        {
            let app = app.clone();
            on_click(document, "undo-btn", move || {
                let mut a = app.borrow_mut();
                if a.editor.undo() {
                    a.after_change();
                }
            });
        }
        {
            let app = app.clone();
            on_click(document, "redo-btn", move || {
                let mut a = app.borrow_mut();
                if a.editor.redo() {
                    a.after_change();
                }
            });
        }
        on_click(document, "export-btn", move || app.borrow().export());
    }

    fn setup_design_buttons(document: &Document, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            on_click(document, "save-btn", move || {
                let name = input_value("design-name");
                app.borrow_mut().save_design(&name);
            });
        }
        {
            let app = app.clone();
            on_click(document, "load-btn", move || {
                let name = select_value("design-select");
                app.borrow_mut().load_design(&name);
            });
        }
        on_click(document, "delete-btn", move || {
            let name = select_value("design-select");
            app.borrow_mut().delete_design(&name);
        });
    }

    /// Keys are bound to `#grid` only, so buttons and selects keep their
    /// native Space/Enter/arrow behavior.
    fn setup_keyboard(document: &Document, app: Rc<RefCell<App>>) {
        let Some(grid) = document.get_element_by_id("grid") else {
            log::warn!("Missing #grid element");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let shortcut = event.ctrl_key() || event.meta_key();
            let Some(command) = GridKey::from_event(&event.key(), shortcut, event.shift_key())
            else {
                return;
            };
            event.prevent_default();

            let mut a = app.borrow_mut();
            let changed = match command {
                GridKey::Undo => a.editor.undo(),
                GridKey::Redo => a.editor.redo(),
                GridKey::Paint => a.editor.paint_focused(),
                GridKey::Move(direction) => {
                    a.editor.move_focus(direction);
                    a.render();
                    false
                }
            };
            if changed {
                a.after_change();
            }
        });
        let _ = grid.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pixel Nostalgia (native) starting...");
    log::info!("The editor runs in the browser - use `trunk serve` for the web version");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Draws a small design with the editor core and exports it
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::error::Error;

    use pixel_nostalgia::designs::LogPrompter;
    use pixel_nostalgia::export::{self, EXPORT_FILENAME, ExportStyle};
    use pixel_nostalgia::{Color, DesignLibrary, Editor, GridSize, MemoryStore, PixelBuffer};

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut editor = Editor::new(GridSize::Small);
        editor.select_color(Color::parse_hex("#ffcc00")?);
        // Left half of a smiley, then mirror to complete it
        for (row, col) in [(2, 2), (5, 1), (6, 2), (6, 3)] {
            let index = editor.pixels().index_of(row, col);
            editor.paint(index);
        }
        let half = editor.pixels().clone();
        editor.mirror_horizontal();
        let whole = merge(&half, editor.pixels());
        editor.replace_pixels(whole);

        let mut library = DesignLibrary::new(MemoryStore::new());
        let mut prompter = LogPrompter { answer: true };
        library.save("smiley", editor.pixels(), &mut prompter)?;
        let loaded = library.load("smiley")?;

        for row in loaded.rows() {
            let line: String = row.iter().map(|c| if c.is_some() { '#' } else { '.' }).collect();
            println!("{line}");
        }

        let bytes = export::encode_png(&loaded, &ExportStyle::default())?;
        std::fs::write(EXPORT_FILENAME, &bytes)?;
        log::info!("Wrote {} ({} bytes)", EXPORT_FILENAME, bytes.len());
        Ok(())
    }

    /// Union of two same-sized buffers, preferring `a`
    fn merge(a: &PixelBuffer, b: &PixelBuffer) -> PixelBuffer {
        let mut out = a.clone();
        for (index, cell) in b.cells().iter().enumerate() {
            if out.get(index).is_none() {
                out.set(index, cell.clone());
            }
        }
        out
    }
}
