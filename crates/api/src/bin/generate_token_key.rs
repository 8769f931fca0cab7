// Generate a token key for AUTH_TOKEN_KEY
//
// Usage: cargo run --bin generate-token-key [key_id]
// Output: key_id:base64_32_bytes (key_id defaults to v1)
//
// To rotate: move the current key to AUTH_TOKEN_KEY_PREVIOUS and set the new one
// as AUTH_TOKEN_KEY. Tokens sealed with the old key keep working until they expire.

fn main() {
    let key_id = std::env::args().nth(1).unwrap_or_else(|| "v1".to_string());
    println!("{}", storefront_core::generate_token_key(&key_id));
}
