use modsum_core::{guid_of, ModuleSummaryIndex};

/// Assert every named function is marked live
pub fn assert_live(index: &ModuleSummaryIndex, names: &[&str]) {
    for name in names {
        let function = index
            .function(guid_of(name))
            .unwrap_or_else(|| panic!("Expected function: {}", name));
        assert!(function.is_live(), "Expected {} to be live", name);
    }
}

/// Assert every named function is left dead
pub fn assert_dead(index: &ModuleSummaryIndex, names: &[&str]) {
    for name in names {
        let function = index
            .function(guid_of(name))
            .unwrap_or_else(|| panic!("Expected function: {}", name));
        assert!(!function.is_live(), "Expected {} to be dead", name);
    }
}

/// Assert the direct callees and slot implementations of every live function are live
pub fn assert_fixed_point(index: &ModuleSummaryIndex) {
    for function in index.functions().filter(|f| f.is_live()) {
        for call in function.calls() {
            match call.slot() {
                Some(slot) => {
                    for implementation in index.implementations(slot) {
                        let target = index.function(implementation).expect("Unknown implementation");
                        assert!(target.is_live(), "{} reaches dead {}", function.label(), target.label());
                    }
                }
                None => {
                    let target = index.function(call.target).expect("Unknown callee");
                    assert!(target.is_live(), "{} reaches dead {}", function.label(), target.label());
                }
            }
        }
    }
}

/// Assert every preserved function is live
pub fn assert_preserved_live(index: &ModuleSummaryIndex) {
    for function in index.functions().filter(|f| f.is_preserved()) {
        assert!(function.is_live(), "Preserved {} is dead", function.label());
    }
}
