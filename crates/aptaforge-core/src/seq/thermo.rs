use super::gc_content;

/// Monovalent and divalent cation concentrations, in mM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaltConditions {
    pub sodium_mm: f64,
    pub magnesium_mm: f64,
}

impl Default for SaltConditions {
    fn default() -> Self {
        Self {
            sodium_mm: 50.0,
            magnesium_mm: 2.0,
        }
    }
}

const WALLACE_RULE_MAX_LEN: usize = 13;

/// Estimated melting temperature in °C.
///
/// Sequences up to 13 nt use the Wallace rule `2(A+T/U) + 4(G+C)`; longer
/// sequences use the salt-corrected GC formula
/// `81.5 + 16.6·log10([Na+]) + 0.41·GC% - 675/len`, with an additional
/// `2·log10([Mg2+])` shift when magnesium is present. Returns 0 for an
/// empty sequence.
pub fn melting_temperature(sequence: &str, salt: SaltConditions) -> f64 {
    let length = sequence.chars().count();
    if length == 0 {
        return 0.0;
    }

    let mut tm = if length <= WALLACE_RULE_MAX_LEN {
        let at = sequence
            .bytes()
            .filter(|b| {
                b.eq_ignore_ascii_case(&b'A')
                    || b.eq_ignore_ascii_case(&b'T')
                    || b.eq_ignore_ascii_case(&b'U')
            })
            .count();
        let gc = sequence
            .bytes()
            .filter(|b| b.eq_ignore_ascii_case(&b'G') || b.eq_ignore_ascii_case(&b'C'))
            .count();
        (2 * at + 4 * gc) as f64
    } else {
        let gc_percent = gc_content(sequence) * 100.0;
        81.5 + 16.6 * (salt.sodium_mm / 1000.0).log10() + 0.41 * gc_percent - 675.0 / length as f64
    };

    if salt.magnesium_mm > 0.0 {
        tm += salt.magnesium_mm.log10() * 2.0;
    }

    tm
}
