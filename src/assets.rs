//! Asset manifest and the loading capability
//!
//! Images load asynchronously in the browser. The renderer never waits on
//! them: it asks an [`AssetProvider`] each frame and keeps drawing the
//! placeholder color until a texture reports `Ready`.

use crate::sim::{GameEvent, PaintColor};

/// Texture a sprite is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Background,
    Shooter,
    Block,
    Paint(PaintColor),
}

impl TextureSlot {
    pub const COUNT: usize = 3 + PaintColor::ALL.len();

    /// Every slot, in index order
    pub fn all() -> impl Iterator<Item = TextureSlot> {
        [TextureSlot::Background, TextureSlot::Shooter, TextureSlot::Block]
            .into_iter()
            .chain(PaintColor::ALL.into_iter().map(TextureSlot::Paint))
    }

    /// Dense index for per-slot tables
    pub fn index(&self) -> usize {
        match self {
            TextureSlot::Background => 0,
            TextureSlot::Shooter => 1,
            TextureSlot::Block => 2,
            TextureSlot::Paint(color) => {
                3 + PaintColor::ALL
                    .iter()
                    .position(|c| c == color)
                    .unwrap_or_default()
            }
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            TextureSlot::Background => "Assets/bg-1.png",
            TextureSlot::Shooter => "Assets/toy-gun-2.png",
            TextureSlot::Block => "Assets/crate.png",
            TextureSlot::Paint(PaintColor::Red) => "Assets/paint-red.png",
            TextureSlot::Paint(PaintColor::Green) => "Assets/paint-green.png",
            TextureSlot::Paint(PaintColor::Blue) => "Assets/paint-blue.png",
            TextureSlot::Paint(PaintColor::Yellow) => "Assets/paint-yellow.png",
            TextureSlot::Paint(PaintColor::Orange) => "Assets/paint-orange.png",
            TextureSlot::Paint(PaintColor::Pink) => "Assets/paint-pink.png",
        }
    }
}

/// Opaque blue shown until an image arrives (RGBA8)
pub const PLACEHOLDER_RGBA: [u8; 4] = [0, 0, 255, 255];

/// Short sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Shoot,
    Destroy,
    Fail,
}

impl SoundCue {
    pub const ALL: [SoundCue; 3] = [SoundCue::Shoot, SoundCue::Destroy, SoundCue::Fail];

    pub fn path(&self) -> &'static str {
        match self {
            SoundCue::Shoot => "Assets/shoot.mp3",
            SoundCue::Destroy => "Assets/destroy.mp3",
            SoundCue::Fail => "Assets/fail.mp3",
        }
    }

    /// Cue that accompanies a simulation event
    pub fn for_event(event: &GameEvent) -> SoundCue {
        match event {
            GameEvent::Fired { .. } => SoundCue::Shoot,
            GameEvent::BlockDestroyed { .. } => SoundCue::Destroy,
            GameEvent::GameOver { .. } => SoundCue::Fail,
        }
    }
}

/// Load status of one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus<T> {
    Ready(T),
    Pending,
}

/// Something that can tell whether a texture's source image has arrived
pub trait AssetProvider {
    type Image;

    fn texture(&self, slot: TextureSlot) -> AssetStatus<&Self::Image>;
}

/// Remembers which slots already made it to the GPU
#[derive(Debug, Clone, Default)]
pub struct UploadTracker {
    uploaded: [bool; TextureSlot::COUNT],
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots whose image became ready since the last call, marked as uploaded
    pub fn take_ready<'a, P: AssetProvider>(
        &mut self,
        provider: &'a P,
    ) -> Vec<(TextureSlot, &'a P::Image)> {
        let mut ready = Vec::new();
        for slot in TextureSlot::all() {
            if self.uploaded[slot.index()] {
                continue;
            }
            if let AssetStatus::Ready(image) = provider.texture(slot) {
                self.uploaded[slot.index()] = true;
                ready.push((slot, image));
            }
        }
        ready
    }

    #[cfg(test)]
    fn is_uploaded(&self, slot: TextureSlot) -> bool {
        self.uploaded[slot.index()]
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAssets;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlImageElement;

    use super::{AssetProvider, AssetStatus, TextureSlot};
    use crate::error::GameError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum LoadState {
        Loading,
        Loaded,
        Failed,
    }

    /// Images fetched by the browser
    pub struct WebAssets {
        images: Vec<(HtmlImageElement, Rc<Cell<LoadState>>)>,
    }

    impl WebAssets {
        /// Start loading every texture image
        pub fn load() -> Result<Self, GameError> {
            let mut images = Vec::with_capacity(TextureSlot::COUNT);
            for slot in TextureSlot::all() {
                let image = HtmlImageElement::new()
                    .map_err(|e| GameError::Dom(format!("image element: {:?}", e)))?;
                let state = Rc::new(Cell::new(LoadState::Loading));

                {
                    let state = state.clone();
                    let path = slot.path();
                    let onload = Closure::<dyn FnMut()>::new(move || {
                        state.set(LoadState::Loaded);
                        log::info!("Loaded {}", path);
                    });
                    image.set_onload(Some(onload.as_ref().unchecked_ref()));
                    onload.forget();
                }
                {
                    let state = state.clone();
                    let path = slot.path();
                    let onerror = Closure::<dyn FnMut()>::new(move || {
                        state.set(LoadState::Failed);
                        log::warn!("Failed to load {}, keeping placeholder", path);
                    });
                    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
                    onerror.forget();
                }

                image.set_src(slot.path());
                images.push((image, state));
            }
            Ok(Self { images })
        }
    }

    impl AssetProvider for WebAssets {
        type Image = HtmlImageElement;

        fn texture(&self, slot: TextureSlot) -> AssetStatus<&HtmlImageElement> {
            match self.images.get(slot.index()) {
                Some((image, state)) if state.get() == LoadState::Loaded => {
                    AssetStatus::Ready(image)
                }
                _ => AssetStatus::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Provider whose images are plain strings, flipped ready by hand
    struct FakeAssets {
        ready: RefCell<HashSet<TextureSlot>>,
        name: String,
    }

    impl AssetProvider for FakeAssets {
        type Image = String;

        fn texture(&self, slot: TextureSlot) -> AssetStatus<&String> {
            if self.ready.borrow().contains(&slot) {
                AssetStatus::Ready(&self.name)
            } else {
                AssetStatus::Pending
            }
        }
    }

    #[test]
    fn test_slot_indices_are_dense() {
        let indices: Vec<usize> = TextureSlot::all().map(|s| s.index()).collect();
        assert_eq!(indices, (0..TextureSlot::COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_paths_are_unique() {
        let paths: HashSet<&str> = TextureSlot::all().map(|s| s.path()).collect();
        assert_eq!(paths.len(), TextureSlot::COUNT);
    }

    #[test]
    fn test_sound_for_event() {
        let fired = GameEvent::Fired {
            projectile_id: 1,
            color: PaintColor::Red,
        };
        assert_eq!(SoundCue::for_event(&fired), SoundCue::Shoot);
        let hit = GameEvent::BlockDestroyed {
            block_id: 2,
            score: 1,
        };
        assert_eq!(SoundCue::for_event(&hit), SoundCue::Destroy);
    }

    #[test]
    fn test_upload_tracker_reports_each_slot_once() {
        let assets = FakeAssets {
            ready: RefCell::new(HashSet::new()),
            name: "img".to_string(),
        };
        let mut tracker = UploadTracker::new();
        assert!(tracker.take_ready(&assets).is_empty());

        assets.ready.borrow_mut().insert(TextureSlot::Block);
        let ready = tracker.take_ready(&assets);
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].0, TextureSlot::Block);
        assert!(tracker.is_uploaded(TextureSlot::Block));

        assets
            .ready
            .borrow_mut()
            .insert(TextureSlot::Paint(PaintColor::Orange));
        let ready = tracker.take_ready(&assets);
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].0, TextureSlot::Paint(PaintColor::Orange));
        assert!(tracker.take_ready(&assets).is_empty());
    }
}
