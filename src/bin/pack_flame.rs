use radixpack::{Alphabet, Encoder, Reader};

fn main() {
    let alphabet = Alphabet::from_spans(&["09", "az", ".", "-"]).unwrap();
    let host = "stun.l.google.com";
    let ports = (0..200u64).map(|i| (i * 7919) % 65536).collect::<Vec<_>>();

    for _ in 0..1000 {
        let mut encoder = Encoder::new();
        for &port in &ports {
            encoder
                .fixed_int(port, 16)
                .unwrap()
                .string(host, &alphabet)
                .unwrap();
        }
        let bytes = encoder.finish();

        let mut reader = Reader::from_bytes(&bytes);
        for &port in &ports {
            assert_eq!(reader.fixed_int(16).unwrap(), port);
            assert_eq!(reader.string(&alphabet).unwrap(), host);
        }
    }
}
