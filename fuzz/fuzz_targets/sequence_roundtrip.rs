#![no_main]
use libfuzzer_sys::fuzz_target;
use radixpack::{Encoder, Reader};

fuzz_target!(|data: Vec<(u64, u64)>| {
    let digits: Vec<(u64, u64)> = data
        .into_iter()
        .filter(|&(_, d)| d > 0)
        .map(|(n, d)| (n % d, d))
        .collect();

    let mut encoder = Encoder::new();
    for &(n, d) in &digits {
        encoder.append(n, d).unwrap();
    }

    let mut reader = Reader::from_bytes(&encoder.finish());
    for &(n, d) in &digits {
        assert_eq!(reader.extract_u64(d).unwrap(), n);
    }
    assert!(reader.is_exhausted());
});
