// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn only_configuration_errors_are_fatal() {
    assert!(TaxonomyError::Configuration.is_fatal());
    assert!(!TaxonomyError::TransientIo.is_fatal());
    assert!(!TaxonomyError::PerEventDecode.is_fatal());
    assert!(!TaxonomyError::PerJobHandler.is_fatal());
    assert!(!TaxonomyError::SchemaEnsure.is_fatal());
}
