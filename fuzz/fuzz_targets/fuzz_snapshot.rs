#![no_main]

use cachegrid::SessionSnapshot;
use cachegrid::game::check_invariants;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(snapshot) = serde_json::from_str::<SessionSnapshot>(text) else {
        return;
    };
    // Any snapshot that restores must be internally consistent.
    if let Ok(session) = snapshot.restore() {
        assert!(check_invariants(&session).is_empty());
        let _ = session.visible_cells();
    }
});
