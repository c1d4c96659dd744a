//! Voices command handler.

use tripletalk_core::VOICES;

/// Print every voice as `id  name`.
pub fn execute() {
    for voice in &VOICES {
        println!("{:>2}  {}", voice.id.get(), voice.name);
    }
}
