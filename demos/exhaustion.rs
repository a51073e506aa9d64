use pagealloc::{Error, PagePool, PoolConfig};

fn main() {
    pretty_env_logger::init();

    let config = PoolConfig {
        size: 4096,
        granularity: 64,
        max_blocks: 512,
    };
    let mut pool = PagePool::with_config(config).expect("config is valid");
    pool.init().expect("could not map the pool");

    // Drain the pool in 256-byte slices.
    let mut handles = Vec::new();
    loop {
        match pool.allocate(256) {
            Ok(ptr) => handles.push(ptr),
            Err(Error::OutOfMemory) => break,
            Err(error) => panic!("unexpected failure: {error}"),
        }
    }
    println!("Pool drained after {} allocations", handles.len());

    // Free every other slice, then ask for something bigger than any
    // remaining hole.
    for ptr in handles.iter().step_by(2) {
        pool.deallocate(ptr.as_ptr()).unwrap();
    }
    println!("Free blocks after punching holes: {:?}", pool.free_blocks());

    match pool.allocate(512) {
        Err(Error::OutOfMemory) => println!("512 bytes refused: holes are only 256 bytes"),
        other => panic!("expected out-of-memory, got {other:?}"),
    }

    // Freeing the rest lets the holes coalesce into one block again.
    for ptr in handles.iter().skip(1).step_by(2) {
        pool.deallocate(ptr.as_ptr()).unwrap();
    }
    println!("Free blocks after full drain: {:?}", pool.free_blocks());

    pool.cleanup().expect("could not unmap the pool");
}
