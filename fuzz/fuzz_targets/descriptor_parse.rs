#![no_main]

use libfuzzer_sys::fuzz_target;
use mdv_descriptor::parse_descriptor;

// The parser must never panic on arbitrary text; every malformed
// input maps to a DescriptorError.
fuzz_target!(|text: &str| {
    if let Ok(descriptor) = parse_descriptor(text) {
        let pose3 = descriptor.initial_pose(3);
        let pose6 = descriptor.initial_pose(6);
        assert!(pose3.len() % 3 == 0);
        assert!(pose6.len() % 6 == 0);
    }
});
