use std::cmp::Ordering;

/// Returns a sort key that orders sequence names karyotypically:
/// numeric (1, 2, …, 22) → X → Y → M/MT → everything else alphabetically.
pub fn seqname_karyotype_key(seqname: &str) -> (u8, u32, String) {
    let bare = seqname.strip_prefix("chr").unwrap_or(seqname);
    match bare {
        "X" => (1, 0, String::new()),
        "Y" => (2, 0, String::new()),
        "M" | "MT" => (3, 0, String::new()),
        _ => match bare.parse::<u32>() {
            Ok(n) => (0, n, String::new()),
            Err(_) => (4, 0, bare.to_string()),
        },
    }
}

/// Compare two sequence names karyotypically, falling back to the raw name.
pub fn cmp_seqnames(a: &str, b: &str) -> Ordering {
    seqname_karyotype_key(a)
        .cmp(&seqname_karyotype_key(b))
        .then_with(|| a.cmp(b))
}
