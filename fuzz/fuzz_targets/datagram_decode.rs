#![no_main]

use libfuzzer_sys::fuzz_target;

use handsync_transport::Datagram;

fuzz_target!(|data: &[u8]| {
    if let Ok(datagram) = Datagram::decode(data) {
        // Whatever parses re-encodes to the same bytes
        assert_eq!(&datagram.encode()[..], data);
    }
});
