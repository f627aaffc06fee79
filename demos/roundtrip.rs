//! Generates a key, moves it through its JSON strings and round-trips a
//! message.
//!
//! ```text
//! cargo run --example roundtrip --features phrase,getrandom -- [bits] [phrase words...]
//! ```
//!
//! With phrase words the key is derived from them and is the same on every
//! run. Padding always comes from the operating system.

use log::info;
use textbook_rsa::rand_core::OsRng;
use textbook_rsa::{GenerationConfig, KeyPair, PhraseRng};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let bits = match args.next() {
        Some(bits) => bits.parse()?,
        None => 1024,
    };
    let phrase = args.collect::<Vec<_>>().join(" ");

    let config = GenerationConfig::new(bits).with_public_exponent(0x10001);
    let key = if phrase.is_empty() {
        KeyPair::generate(&mut OsRng, &config)?
    } else {
        info!("deriving the key from a phrase; this is not a secure entropy source");
        KeyPair::generate(&mut PhraseRng::new(&phrase), &config)?
    };

    let public_string = key.public_string()?;
    let private_string = key.private_string()?;
    println!("Public Key: {public_string}");
    println!("Private Key: {private_string}");

    let public = KeyPair::from_public_string(&public_string)?;
    let origin_text = "sample String Value";
    let encrypted = public.encrypt(&mut OsRng, origin_text)?;
    println!("{encrypted}");

    let private = KeyPair::from_private_string(&private_string)?;
    let decrypted = private.decrypt(&encrypted)?;
    println!("{decrypted}");

    assert_eq!(decrypted, origin_text);
    Ok(())
}
