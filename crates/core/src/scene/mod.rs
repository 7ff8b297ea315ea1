use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::KeyImage;

mod catalog;

pub use catalog::SceneCatalog;

/// What a scene teaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Alphabet,
    Numerals,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Alphabet, Category::Numerals];

    /// Directory name used for both image and sound assets.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Alphabet => "abc",
            Category::Numerals => "123",
        }
    }

    /// Glyph names in key order. Numerals run 0 to 19, then 20 to 100 in
    /// tens: 29 keys.
    pub fn glyphs(self) -> Vec<String> {
        match self {
            Category::Alphabet => ('a'..='z').map(String::from).collect(),
            Category::Numerals => (0..20)
                .chain((20..=100).step_by(10))
                .map(|value: u32| format!("{value:03}"))
                .collect(),
        }
    }

    pub fn other(self) -> Self {
        match self {
            Category::Alphabet => Category::Numerals,
            Category::Numerals => Category::Alphabet,
        }
    }
}

/// One of the two narrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Primary,
    Secondary,
}

impl Voice {
    pub const ALL: [Voice; 2] = [Voice::Primary, Voice::Secondary];

    pub fn other(self) -> Self {
        match self {
            Voice::Primary => Voice::Secondary,
            Voice::Secondary => Voice::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneId {
    pub category: Category,
    pub voice: Voice,
}

impl SceneId {
    pub fn new(category: Category, voice: Voice) -> Self {
        Self { category, voice }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let category = match self.category {
            Category::Alphabet => "alphabet",
            Category::Numerals => "numerals",
        };
        let voice = match self.voice {
            Voice::Primary => "primary",
            Voice::Secondary => "secondary",
        };
        write!(f, "{category}/{voice}")
    }
}

/// Behaviour of a single live key.
#[derive(Debug, Clone)]
pub struct KeySlot {
    pub inactive: KeyImage,
    pub active: KeyImage,
    /// Clip played to completion on press.
    pub sound: Option<PathBuf>,
    /// Scene entered on press, after the clip has finished.
    pub transition: Option<SceneId>,
}

impl KeySlot {
    pub fn new(inactive: KeyImage, active: KeyImage) -> Self {
        Self {
            inactive,
            active,
            sound: None,
            transition: None,
        }
    }

    pub fn with_sound(mut self, sound: impl Into<PathBuf>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    pub fn with_transition(mut self, target: SceneId) -> Self {
        self.transition = Some(target);
        self
    }
}

/// Fixed-length key layout in hardware row-major order. `None` marks a gap.
#[derive(Debug, Clone)]
pub struct Scene {
    id: SceneId,
    slots: Vec<Option<KeySlot>>,
}

impl Scene {
    pub fn new(id: SceneId, slots: Vec<Option<KeySlot>>) -> Self {
        Self { id, slots }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at `index`, or `None` for gaps and indices past the layout.
    pub fn slot(&self, index: usize) -> Option<&KeySlot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Every non-gap slot with its key index.
    pub fn active_keys(&self) -> impl Iterator<Item = (usize, &KeySlot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|slot| (index, slot)))
    }
}
