//! Asset collaborators.
//!
//! Decoding an archive never touches costume or sound data; the tables only
//! record where that data lives. Loading and decoding the bytes is the job of
//! two collaborators supplied by the embedding application:
//!
//! * [`AssetStore`] - resolves `(id, extension)` to raw bytes.
//! * [`AudioDecoder`] - turns raw sound bytes into a playable sound handle.
//!
//! [`load_sound`] wires the two together for a single sound.

use std::io;

use log::error;

/// Category of an asset in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    ImageBitmap,
    ImageVector,
    Sound,
}

/// Raw asset bytes as returned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub kind: AssetKind,
    pub asset_id: String,
    pub data: Vec<u8>,
}

/// Source of raw asset bytes.
pub trait AssetStore {
    fn load(&self, kind: AssetKind, id: &str, ext: &str) -> io::Result<Asset>;
}

/// Turns raw sound bytes into a handle the audio engine can play.
pub trait AudioDecoder {
    /// Returns the engine's id for the decoded sound.
    fn decode_sound(&self, sound: &Sound, data: &[u8]) -> io::Result<String>;
}

/// A sound referenced by a target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sound {
    pub name: String,
    /// Content hash, without extension.
    pub md5: String,
    /// File extension, e.g. `wav`.
    pub data_format: String,
    /// Set once the bytes have been loaded.
    pub asset_id: Option<String>,
    /// Set once the audio engine has decoded the sound.
    pub sound_id: Option<String>,
}

/// Load and decode `sound`.
///
/// When either collaborator is missing the sound is returned unchanged and
/// an error is logged; a missing collaborator does not fail the load.
pub fn load_sound(
    mut sound: Sound,
    store: Option<&dyn AssetStore>,
    audio: Option<&dyn AudioDecoder>,
) -> io::Result<Sound> {
    let Some(store) = store else {
        error!("no asset store present; cannot load sound asset {}", sound.md5);
        return Ok(sound);
    };
    let Some(audio) = audio else {
        error!("no audio decoder present; cannot load sound asset {}", sound.md5);
        return Ok(sound);
    };

    let asset = store.load(AssetKind::Sound, &sound.md5, &sound.data_format)?;
    sound.asset_id = Some(asset.asset_id);
    sound.sound_id = Some(audio.decode_sound(&sound, &asset.data)?);
    Ok(sound)
}
