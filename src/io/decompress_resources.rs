//! Decoder and dictionary shared across the files of one run.
//!
//! [`DecompressResources`] owns a single [`FrameDecoder`] whose arena is kept
//! between frames and files, plus the optional dictionary named in
//! [`Prefs`]. Dictionary files are loaded as raw content: only the trailing
//! [`MAX_WINDOW_SIZE`] bytes are kept, since no match can reach further back.

use std::fs;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use crate::dictionary::Dictionary;
use crate::frame::{FrameDecoder, MAX_WINDOW_SIZE};
use crate::io::prefs::Prefs;

// ---------------------------------------------------------------------------
// Dictionary loading
// ---------------------------------------------------------------------------

/// Loads the last [`MAX_WINDOW_SIZE`] bytes of `dict_path`.
pub fn load_dict_file(dict_path: &Path) -> io::Result<Vec<u8>> {
    let mut file = fs::File::open(dict_path)?;

    // Skip straight to the tail when the file is seekable and large.
    let _ = file.seek(SeekFrom::End(-(MAX_WINDOW_SIZE as i64)));

    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    if content.len() > MAX_WINDOW_SIZE {
        content.drain(..content.len() - MAX_WINDOW_SIZE);
    }
    Ok(content)
}

// ---------------------------------------------------------------------------
// DecompressResources
// ---------------------------------------------------------------------------

pub struct DecompressResources {
    /// Decoder reused for every frame.
    pub decoder: FrameDecoder,

    /// Dictionary handed to the decoder at the start of each frame.
    pub dictionary: Option<Arc<Dictionary>>,
}

impl DecompressResources {
    /// Creates resources with no dictionary.
    pub fn new() -> Self {
        DecompressResources { decoder: FrameDecoder::new(), dictionary: None }
    }

    /// Creates resources primed with `dictionary`.
    pub fn with_dictionary(dictionary: Dictionary) -> Self {
        DecompressResources { decoder: FrameDecoder::new(), dictionary: Some(Arc::new(dictionary)) }
    }

    /// Creates resources, loading a dictionary from `prefs.dictionary_filename`
    /// if `prefs.use_dictionary` is set.
    pub fn from_prefs(prefs: &Prefs) -> io::Result<Self> {
        match prefs.dictionary_filename.as_deref() {
            Some(path) if prefs.use_dictionary => {
                let content = load_dict_file(Path::new(path)).map_err(|e| {
                    io::Error::new(e.kind(), format!("Dictionary error : could not read {path}: {e}"))
                })?;
                crate::displaylevel!(4, "Loaded dictionary {} ({} bytes)\n", path, content.len());
                Ok(Self::with_dictionary(Dictionary::new(prefs.dictionary_id, content)))
            }
            _ => Ok(Self::new()),
        }
    }
}

impl Default for DecompressResources {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
