//! Ring buffer demo: a writer and two readers sharing one region

use shmring::{BackingType, RingBuffer, RingConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Shared Ring Buffer Demo");
    println!("=======================");

    let path = std::env::temp_dir().join(format!("shmring_demo_{}", std::process::id()));
    let config = RingConfig::new("demo")
        .with_item_size(2)
        .with_length(8)
        .with_backing_type(BackingType::FileBacked)
        .with_file_path(&path);

    let mut writer = RingBuffer::new(config.clone().with_create(true))?;
    let mut reader = RingBuffer::new(config.clone())?;

    println!(
        "Created {} ({} slots of {} bytes, {} region bytes)",
        writer,
        writer.length(),
        writer.item_size(),
        writer.layout().region_size()
    );

    // Publish a burst
    println!("\nPushing 5 items...");
    for i in 1..=5 {
        writer.push(i * 100)?;
        println!("  pushed {}", i * 100);
    }
    println!("Reader view: {}", reader);

    // Drain it
    println!("\nDraining...");
    for item in reader.pop_many(8)? {
        println!("  popped {}", item);
    }
    println!("Reader view: {}", reader);

    // Overflow the ring to show the overwrite policy
    println!("\nPushing 11 items into 8 slots...");
    for i in 1..=11 {
        writer.push(i)?;
    }
    let survivors = reader.pop_many(11)?;
    println!("  survivors: {:?} (oldest items were overwritten)", survivors);

    // A second reader attached later sees the stream from its own pointer
    let mut late_reader = RingBuffer::new(config)?;
    writer.push(4242)?;
    println!("\nLate reader backlog: {} items", late_reader.usage());
    println!("Late reader stats: {:?}", late_reader.stats());
    while let Some(item) = late_reader.pop()? {
        if item == 4242 {
            println!("  late reader caught up at {}", item);
        }
    }

    // The writer owns the name; cleanup frees it for reuse
    late_reader.cleanup()?;
    reader.cleanup()?;
    writer.cleanup()?;
    println!("\nRegion destroyed, name free for reuse");

    Ok(())
}
