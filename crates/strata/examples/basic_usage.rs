//! Basic Usage Example
//!
//! Demonstrates:
//! - Building a codec with an upgrade height and registered types
//! - Writing state before and after the format upgrade
//! - Reading each value back at the height it was written
//! - Batched migration of a key range into the modern format
//!
//! Run with: cargo run --example basic_usage

use strata::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Account {
    addr: String,
    balance: u64,
}
impl Encodable for Account {}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("strata=debug")
        .init();

    println!("=== Strata Basic Usage ===\n");

    // 1. Codec: legacy below height 9, modern from 9 on
    let mut builder = DualCodec::builder(CodecConfig::new(9).with_feature("RSCAL", 20));
    builder.register_structure::<Account>("auth/Account")?;
    let db = StateDb::new(Arc::new(builder.build()?), MemDb::new());

    // 2. Write the same account on both sides of the upgrade
    let account = Account {
        addr: "abc".into(),
        balance: 100,
    };
    for height in [5, 9] {
        let bytes = db.codec().marshal_binary_bare(&account, height)?;
        println!(
            "height {:>2} ({}): {} bytes",
            height,
            db.codec().upgrade_gate().format_at(height),
            bytes.len()
        );
    }

    // 3. Historical state stays readable at its own height
    db.put(b"acct/abc", &account, 5)?;
    let loaded: Option<Account> = db.get(b"acct/abc", 5)?;
    println!("\nread at height 5: {:?}", loaded);
    match db.get::<Account>(b"acct/abc", 9) {
        Ok(_) => println!("unexpected: legacy bytes decoded as modern"),
        Err(e) => println!("read at height 9 fails as expected: {}", e),
    }

    // 4. Migrate the range into the modern format in one batch
    let legacy = db.range::<Account>(Some(b"acct/"), Some(b"acct0"), 5)?;
    let mut batch = db.batch(9);
    for (key, value) in &legacy {
        batch.put(key, value)?;
    }
    let info = batch.write()?;
    println!("\nmigrated {} keys", info.keys_written);
    println!("read at latest: {:?}", db.get::<Account>(b"acct/abc", LATEST_HEIGHT)?);

    // 5. Feature activation window
    let features = db.codec().features();
    for height in [14, 15, 20, 25, 26] {
        println!(
            "RSCAL within 5 of height {}: {}",
            height,
            features.is_on_activation_height_with_tolerance(height, "RSCAL", 5)
        );
    }

    let stats = db.codec().decode_cache().stats();
    println!("\ndecode cache: {}/{} entries", stats.size, stats.capacity);

    println!("\n=== Example Complete ===");
    Ok(())
}
