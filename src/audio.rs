//! Audio cues using HTML audio elements
//!
//! Three short clips (shoot, destroy, fail) are preloaded once and rewound on
//! every play, so rapid fire restarts the clip instead of queueing.

use web_sys::HtmlAudioElement;

use crate::assets::SoundCue;
use crate::settings::Settings;

/// Audio manager for the game
pub struct AudioManager {
    /// Indexed like `SoundCue::ALL`; `None` when the element could not be created
    clips: Vec<Option<HtmlAudioElement>>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let clips = SoundCue::ALL
            .iter()
            .map(|cue| match HtmlAudioElement::new_with_src(cue.path()) {
                Ok(clip) => {
                    clip.set_preload("auto");
                    Some(clip)
                }
                Err(e) => {
                    log::warn!("Failed to create audio for {}: {:?}", cue.path(), e);
                    None
                }
            })
            .collect();

        Self {
            clips,
            volume: settings.effective_volume(),
        }
    }

    /// Pick up volume and mute preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Play a cue from the start
    pub fn play(&self, cue: SoundCue) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let index = SoundCue::ALL.iter().position(|c| *c == cue);
        let Some(Some(clip)) = index.and_then(|i| self.clips.get(i)) else {
            return;
        };

        clip.set_volume(vol as f64);
        clip.set_current_time(0.0);
        let promise = match clip.play() {
            Ok(promise) => promise,
            Err(e) => {
                log::debug!("Audio play failed for {}: {:?}", cue.path(), e);
                return;
            }
        };
        // Autoplay policy rejects playback before the first user gesture
        let path = cue.path();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log::debug!("Audio play rejected for {}: {:?}", path, e);
            }
        });
    }
}
