use pagealloc::PagePool;

fn main() {
    pretty_env_logger::init();

    let mut pool = PagePool::new();
    pool.init().expect("could not map the pool");

    let granularity = pool.config().granularity;
    println!(
        "Pool of {} bytes ready, granularity {} bytes",
        pool.config().size,
        granularity
    );

    let a = pool.allocate(2 * granularity).unwrap();
    println!("Received this address: {a:?}");

    let b = pool.allocate(granularity).unwrap();
    println!("Received this address: {b:?}");

    println!("Free blocks: {:?}", pool.free_blocks());

    println!("Deallocating both");
    pool.deallocate(a.as_ptr()).unwrap();
    pool.deallocate(b.as_ptr()).unwrap();

    // Everything coalesced back into one block covering the pool.
    println!("Free blocks: {:?}", pool.free_blocks());

    pool.cleanup().expect("could not unmap the pool");
}
