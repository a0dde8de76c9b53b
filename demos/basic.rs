use bloom_filter::{BloomFilter, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let bf = BloomFilter::new(1000, 3)?;
    for fruit in ["apple", "banana", "cherry"] {
        bf.insert(fruit.as_bytes());
    }

    println!("contains 'apple': {}", bf.lookup(b"apple"));
    println!("contains 'grape': {}", bf.lookup(b"grape"));
    println!("number of elements: {}", bf.count());
    println!(
        "estimated false positive rate: {:.4}",
        bf.estimated_false_positive_rate()
    );
    println!(
        "optimal hash count for 100 elements: {}",
        bf.optimal_hash_count(100)
    );

    let other = BloomFilter::new(1000, 3)?;
    other.insert(b"date");
    let union = bf.union(&other)?;
    println!("union contains 'apple': {}", union.lookup(b"apple"));
    println!("union contains 'date': {}", union.lookup(b"date"));

    let decoded = BloomFilter::deserialize(&bf.serialize())?;
    println!("decoded filter contains 'banana': {}", decoded.lookup(b"banana"));

    if let Err(err) = bf.union(&BloomFilter::new(500, 3)?) {
        println!("union with a smaller filter: {err}");
    }
    Ok(())
}
