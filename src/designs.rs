//! Named designs persisted as one JSON record
//!
//! All designs live in a single `{ name: [cells...] }` object under one
//! storage key. Every mutation is a whole-record read-modify-write.

use std::collections::BTreeMap;

use crate::error::DesignError;
use crate::grid::PixelBuffer;
use crate::store::KeyValueStore;

/// Storage key of the design record
pub const DESIGNS_KEY: &str = "pixel-art-designs";

/// User-facing yes/no prompt and notification capability
pub trait Prompter {
    /// Ask before a destructive step; `false` cancels it
    fn confirm(&mut self, message: &str) -> bool;
    /// Report a completed step
    fn notify(&mut self, message: &str);
}

/// Answers every prompt the same way and writes messages to the log
#[derive(Debug, Clone, Copy)]
pub struct LogPrompter {
    pub answer: bool,
}

impl Prompter for LogPrompter {
    fn confirm(&mut self, message: &str) -> bool {
        log::info!("{} -> {}", message, if self.answer { "yes" } else { "no" });
        self.answer
    }

    fn notify(&mut self, message: &str) {
        log::info!("{}", message);
    }
}

/// Result of a save or delete that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Store updated; carries the current sorted name list
    Done(Vec<String>),
    /// The user declined the confirmation prompt
    Cancelled,
}

type Designs = BTreeMap<String, PixelBuffer>;

/// Name → pixel buffer library over a [`KeyValueStore`]
#[derive(Debug)]
pub struct DesignLibrary<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> DesignLibrary<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DESIGNS_KEY.to_string(),
        }
    }

    fn read(&self) -> Result<Designs, DesignError> {
        match self.store.get(&self.key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Designs::new()),
        }
    }

    fn write(&mut self, designs: &Designs) -> Result<(), DesignError> {
        let json = serde_json::to_string(designs)?;
        self.store.set(&self.key, &json)?;
        Ok(())
    }

    /// Saved design names, sorted
    pub fn list_names(&self) -> Result<Vec<String>, DesignError> {
        Ok(self.read()?.into_keys().collect())
    }

    /// Save `pixels` under `name`, asking before overwriting an existing design
    pub fn save(
        &mut self,
        name: &str,
        pixels: &PixelBuffer,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, DesignError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DesignError::EmptyName);
        }

        let mut designs = self.read()?;
        if designs.contains_key(name)
            && !prompter.confirm(&format!("A design named \"{name}\" already exists. Overwrite it?"))
        {
            log::info!("Overwrite of design {:?} cancelled", name);
            return Ok(Outcome::Cancelled);
        }

        designs.insert(name.to_string(), pixels.clone());
        self.write(&designs)?;
        log::info!("Design {:?} saved ({} designs stored)", name, designs.len());
        prompter.notify(&format!("Design \"{name}\" saved."));
        Ok(Outcome::Done(designs.into_keys().collect()))
    }

    /// Fetch a saved design
    pub fn load(&self, name: &str) -> Result<PixelBuffer, DesignError> {
        let name = name.trim();
        let mut designs = self.read()?;
        let pixels = designs
            .remove(name)
            .ok_or_else(|| DesignError::NotFound(name.to_string()))?;
        log::info!("Design {:?} loaded", name);
        Ok(pixels)
    }

    /// Delete a saved design after confirmation.
    ///
    /// With nothing stored this is a silent no-op.
    pub fn delete(&mut self, name: &str, prompter: &mut dyn Prompter) -> Result<Outcome, DesignError> {
        let name = name.trim();
        let mut designs = self.read()?;
        if designs.is_empty() {
            return Ok(Outcome::Done(Vec::new()));
        }
        if !designs.contains_key(name) {
            return Err(DesignError::NotFound(name.to_string()));
        }
        if !prompter.confirm(&format!("Delete design \"{name}\"? This cannot be undone.")) {
            log::info!("Delete of design {:?} cancelled", name);
            return Ok(Outcome::Cancelled);
        }

        designs.remove(name);
        self.write(&designs)?;
        log::info!("Design {:?} deleted ({} designs stored)", name, designs.len());
        prompter.notify(&format!("Design \"{name}\" deleted."));
        Ok(Outcome::Done(designs.into_keys().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Editor;
    use crate::grid::{Color, GridSize};
    use crate::store::MemoryStore;
    use proptest::prelude::*;

    /// Replays scripted confirmation answers and records every message
    #[derive(Default)]
    struct ScriptedPrompter {
        answers: Vec<bool>,
        confirms: Vec<String>,
        notices: Vec<String>,
    }

    impl ScriptedPrompter {
        fn answering(answers: &[bool]) -> Self {
            Self {
                answers: answers.iter().rev().copied().collect(),
                ..Default::default()
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn confirm(&mut self, message: &str) -> bool {
            self.confirms.push(message.to_string());
            self.answers.pop().expect("unexpected confirmation prompt")
        }

        fn notify(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }
    }

    fn smiley() -> PixelBuffer {
        let mut buf = PixelBuffer::new(GridSize::Small);
        for i in [18, 21, 42, 45, 51, 52] {
            buf.set(i, Some(Color::new("#ffcc00").unwrap()));
        }
        buf
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let library = DesignLibrary::new(MemoryStore::new());
        assert!(library.list_names().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut library = DesignLibrary::new(MemoryStore::new());
        let mut prompter = ScriptedPrompter::default();
        let outcome = library.save("smiley", &smiley(), &mut prompter).unwrap();
        assert_eq!(outcome, Outcome::Done(vec!["smiley".to_string()]));
        assert_eq!(library.load("smiley").unwrap(), smiley());
        assert!(prompter.confirms.is_empty());
        assert_eq!(prompter.notices.len(), 1);
    }

    #[test]
    fn test_save_trims_name_and_rejects_blank() {
        let mut library = DesignLibrary::new(MemoryStore::new());
        let mut prompter = ScriptedPrompter::default();
        assert!(matches!(
            library.save("   ", &smiley(), &mut prompter),
            Err(DesignError::EmptyName)
        ));
        assert_eq!(library.store.get(DESIGNS_KEY).unwrap(), None);

        library.save("  cat ", &smiley(), &mut prompter).unwrap();
        assert_eq!(library.list_names().unwrap(), vec!["cat"]);
    }

    #[test]
    fn test_overwrite_requires_confirmation() {
        let mut library = DesignLibrary::new(MemoryStore::new());
        let blank = PixelBuffer::new(GridSize::Small);
        library.save("art", &smiley(), &mut ScriptedPrompter::default()).unwrap();

        let mut decline = ScriptedPrompter::answering(&[false]);
        assert_eq!(library.save("art", &blank, &mut decline).unwrap(), Outcome::Cancelled);
        assert_eq!(decline.confirms.len(), 1);
        assert!(decline.notices.is_empty());
        assert_eq!(library.load("art").unwrap(), smiley());

        let mut accept = ScriptedPrompter::answering(&[true]);
        library.save("art", &blank, &mut accept).unwrap();
        assert_eq!(library.load("art").unwrap(), blank);
    }

    #[test]
    fn test_names_are_sorted() {
        let mut library = DesignLibrary::new(MemoryStore::new());
        let mut prompter = ScriptedPrompter::default();
        for name in ["zebra", "apple", "mango"] {
            library.save(name, &smiley(), &mut prompter).unwrap();
        }
        assert_eq!(library.list_names().unwrap(), vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_delete_scenario_leaves_editor_untouched() {
        let mut library = DesignLibrary::new(MemoryStore::new());
        library.save("smiley", &smiley(), &mut ScriptedPrompter::default()).unwrap();

        let mut prompter = ScriptedPrompter::answering(&[true]);
        let outcome = library.delete("smiley", &mut prompter).unwrap();
        assert_eq!(outcome, Outcome::Done(vec![]));
        assert!(!library.list_names().unwrap().contains(&"smiley".to_string()));

        let mut editor = Editor::new(GridSize::Small);
        editor.paint(3);
        let before = editor.pixels().clone();
        match library.load("smiley") {
            Ok(pixels) => editor.replace_pixels(pixels),
            Err(err) => assert!(matches!(err, DesignError::NotFound(_))),
        }
        assert_eq!(editor.pixels(), &before);
    }

    #[test]
    fn test_delete_declined_keeps_design() {
        let mut library = DesignLibrary::new(MemoryStore::new());
        library.save("keep", &smiley(), &mut ScriptedPrompter::default()).unwrap();
        let mut prompter = ScriptedPrompter::answering(&[false]);
        assert_eq!(library.delete("keep", &mut prompter).unwrap(), Outcome::Cancelled);
        assert_eq!(library.list_names().unwrap(), vec!["keep"]);
    }

    #[test]
    fn test_delete_with_nothing_stored_is_silent() {
        let mut library = DesignLibrary::new(MemoryStore::new());
        // No answers scripted: any prompt would panic
        let mut prompter = ScriptedPrompter::default();
        assert_eq!(library.delete("ghost", &mut prompter).unwrap(), Outcome::Done(vec![]));
        assert!(prompter.notices.is_empty());
    }

    #[test]
    fn test_delete_unknown_name_is_not_found() {
        let mut library = DesignLibrary::new(MemoryStore::new());
        library.save("real", &smiley(), &mut ScriptedPrompter::default()).unwrap();
        let mut prompter = ScriptedPrompter::default();
        assert!(matches!(
            library.delete("ghost", &mut prompter),
            Err(DesignError::NotFound(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_corrupt_record_is_not_overwritten() {
        let mut store = MemoryStore::new();
        store.set(DESIGNS_KEY, "{not json").unwrap();
        let mut library = DesignLibrary::new(store);
        let result = library.save("x", &smiley(), &mut ScriptedPrompter::default());
        assert!(matches!(result, Err(DesignError::Corrupt(_))));
        assert_eq!(
            library.store.get(DESIGNS_KEY).unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_record_format_is_flat_mapping() {
        let mut library = DesignLibrary::new(MemoryStore::new());
        let mut buf = PixelBuffer::new(GridSize::Small);
        buf.set(0, Some(Color::new("#ff0000").unwrap()));
        library.save("one", &buf, &mut ScriptedPrompter::default()).unwrap();

        let json = library.store.get(DESIGNS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let cells = value["one"].as_array().unwrap();
        assert_eq!(cells.len(), 64);
        assert_eq!(cells[0], "#ff0000");
        assert_eq!(cells[1], "");
    }

    proptest! {
        #[test]
        fn prop_save_load_roundtrip(
            name in "[a-zA-Z0-9 _-]{0,12}[a-zA-Z0-9]",
            size in prop::sample::select(GridSize::ALL.to_vec()),
            painted in prop::collection::vec(0usize..1024, 0..40),
        ) {
            let mut buf = PixelBuffer::new(size);
            for i in painted {
                buf.toggle(i % buf.len(), &Color::new("#0f0f0f").unwrap());
            }
            let mut library = DesignLibrary::new(MemoryStore::new());
            library.save(&name, &buf, &mut ScriptedPrompter::default()).unwrap();
            prop_assert_eq!(library.load(&name).unwrap(), buf);
        }
    }
}
