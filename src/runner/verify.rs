// src/runner/verify.rs — Match hashcat output against the target hash
//
// hashcat prints recovered entries as `hash:salt:...:plaintext`. We take the
// first line mentioning the target hash and keep its trailing field.

/// Extract the recovered plaintext for `target_hash` from hashcat's stdout.
///
/// Returns `None` if no line contains the hash. The returned field may be
/// empty; callers decide whether that counts as a match.
pub fn extract(target_hash: &str, stdout: &str) -> Option<String> {
    stdout
        .split('\n')
        .find(|line| line.contains(target_hash))
        .and_then(|line| line.trim().split(':').next_back())
        .map(|field| field.trim().to_string())
}
