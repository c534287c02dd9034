// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! Fixed Desikan anatomical region table.
//!
//! Atlas labels use the legacy numbering: 1..=35 for the left hemisphere and
//! 101..=135 for the right. [`translate_label`] folds both ranges onto the
//! contiguous logical indices 0..=69 used as small-graph vertex ids; the
//! right hemisphere subtracts a fixed 66 (101 -> 35, ..., 135 -> 69).

/// Number of logical regions (both hemispheres).
pub const REGION_COUNT: usize = 70;

/// Offset subtracted from opposite-hemisphere labels (> 100).
const OPPOSITE_HEMISPHERE_OFFSET: i32 = 66;

/// Region names indexed by logical region index, 0..=69.
pub const REGION_NAMES: [&str; REGION_COUNT] = [
    "lh-unknown",
    "lh-bankssts",
    "lh-caudalanteriorcingulate",
    "lh-caudalmiddlefrontal",
    "lh-corpuscallosum",
    "lh-cuneus",
    "lh-entorhinal",
    "lh-fusiform",
    "lh-inferiorparietal",
    "lh-inferiortemporal",
    "lh-isthmuscingulate",
    "lh-lateraloccipital",
    "lh-lateralorbitofrontal",
    "lh-lingual",
    "lh-medialorbitofrontal",
    "lh-middletemporal",
    "lh-parahippocampal",
    "lh-paracentral",
    "lh-parsopercularis",
    "lh-parsorbitalis",
    "lh-parstriangularis",
    "lh-pericalcarine",
    "lh-postcentral",
    "lh-posteriorcingulate",
    "lh-precentral",
    "lh-precuneus",
    "lh-rostralanteriorcingulate",
    "lh-rostralmiddlefrontal",
    "lh-superiorfrontal",
    "lh-superiorparietal",
    "lh-superiortemporal",
    "lh-supramarginal",
    "lh-frontalpole",
    "lh-temporalpole",
    "lh-transversetemporal",
    "rh-unknown",
    "rh-bankssts",
    "rh-caudalanteriorcingulate",
    "rh-caudalmiddlefrontal",
    "rh-corpuscallosum",
    "rh-cuneus",
    "rh-entorhinal",
    "rh-fusiform",
    "rh-inferiorparietal",
    "rh-inferiortemporal",
    "rh-isthmuscingulate",
    "rh-lateraloccipital",
    "rh-lateralorbitofrontal",
    "rh-lingual",
    "rh-medialorbitofrontal",
    "rh-middletemporal",
    "rh-parahippocampal",
    "rh-paracentral",
    "rh-parsopercularis",
    "rh-parsorbitalis",
    "rh-parstriangularis",
    "rh-pericalcarine",
    "rh-postcentral",
    "rh-posteriorcingulate",
    "rh-precentral",
    "rh-precuneus",
    "rh-rostralanteriorcingulate",
    "rh-rostralmiddlefrontal",
    "rh-superiorfrontal",
    "rh-superiorparietal",
    "rh-superiortemporal",
    "rh-supramarginal",
    "rh-frontalpole",
    "rh-temporalpole",
    "rh-transversetemporal",
];

/// Fold an atlas label onto its logical region index.
///
/// Labels 1..=35 map to 0..=34 (1-based correspondence); labels 101..=135
/// map to 35..=69. Anything else (0, gaps, out of table) has no region.
pub fn translate_label(label: i32) -> Option<u32> {
    match label {
        1..=35 => Some((label - 1) as u32),
        101..=135 => Some((label - OPPOSITE_HEMISPHERE_OFFSET) as u32),
        _ => None,
    }
}

/// Name of a logical region index.
pub fn region_name(index: u32) -> Option<&'static str> {
    REGION_NAMES.get(index as usize).copied()
}

/// Name of an atlas label, through [`translate_label`].
pub fn label_name(label: i32) -> Option<&'static str> {
    translate_label(label).and_then(region_name)
}
