// prefs.rs: runtime preferences for the file-level decompression API.
//
// The CLI fills a `Prefs` value from its arguments and hands it to
// `decompress_filename` / `decompress_multiple_filenames` / `decompress_stream`.
// Display verbosity is not stored here: it lives in the process-wide level in
// `cli::constants` so the frame decoder can log without a handle.

use crate::frame::DecodeOptions;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Size of the magic number that starts every frame.
pub const MAGICNUMBER_SIZE: usize = 4;

// ---------------------------------------------------------------------------
// Preferences struct
// ---------------------------------------------------------------------------

/// Tunable parameters for file and stream decompression.
#[derive(Clone, Debug)]
pub struct Prefs {
    /// Overwrite existing destination files without prompting. Default: false.
    pub overwrite: bool,
    /// Test mode: decompress and verify, but discard output. Default: false.
    pub test_mode: bool,
    /// Verify content checksums when frames carry one. Default: true.
    pub stream_checksum: bool,
    /// Use a dictionary. Derived from `dictionary_filename`.
    pub use_dictionary: bool,
    /// Path to a raw-content dictionary file, if any.
    pub dictionary_filename: Option<String>,
    /// Id given to the dictionary loaded from `dictionary_filename`; 0 accepts
    /// any frame.
    pub dictionary_id: u32,
    /// Remove source file after successful decompression. Default: false.
    pub remove_src_file: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Prefs {
            overwrite: false,
            test_mode: false,
            stream_checksum: true,
            use_dictionary: false,
            dictionary_filename: None,
            dictionary_id: 0,
            remove_src_file: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Preference setters
// ---------------------------------------------------------------------------

impl Prefs {
    /// Creates a new `Prefs` with all defaults applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dictionary file path. Passing `None` clears the dictionary.
    /// Returns true if a dictionary is now active.
    pub fn set_dictionary_filename(&mut self, filename: Option<&str>) -> bool {
        self.dictionary_filename = filename.map(|s| s.to_owned());
        self.use_dictionary = self.dictionary_filename.is_some();
        self.use_dictionary
    }

    pub fn set_dictionary_id(&mut self, id: u32) -> u32 {
        self.dictionary_id = id;
        id
    }

    /// Enables or disables destination-file overwrite. Returns the new value.
    pub fn set_overwrite(&mut self, yes: bool) -> bool {
        self.overwrite = yes;
        yes
    }

    /// Enables or disables test mode (decompress, discard). Returns the new value.
    pub fn set_test_mode(&mut self, yes: bool) -> bool {
        self.test_mode = yes;
        yes
    }

    /// Enables or disables content checksum verification. Returns the new value.
    pub fn set_stream_checksum_mode(&mut self, enable: bool) -> bool {
        self.stream_checksum = enable;
        enable
    }

    /// Enables or disables removal of the source file after processing.
    pub fn set_remove_src_file(&mut self, flag: bool) {
        self.remove_src_file = flag;
    }

    /// Decoder options for frames whose magic has already been read.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions { skip_magic: true, skip_checksum: !self.stream_checksum }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
