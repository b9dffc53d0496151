/// Diploid genotype call at a biallelic site.
///
/// Only the three unphased calls `0/0`, `0/1` and `1/1` are recognised. Anything
/// else (`./.`, phased calls, `1/0`, calls naming a second ALT) is `Missing`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Genotype {
    HomRef,
    Het,
    HomAlt,
    Missing,
}

impl Genotype {
    /// Parse a bare GT call such as `0/1`.
    pub fn from_call(call: &str) -> Self {
        match call {
            "0/0" => Self::HomRef,
            "0/1" => Self::Het,
            "1/1" => Self::HomAlt,
            _ => Self::Missing,
        }
    }

    /// Parse a full per-sample column (`GT:AD:DP...`), using only the GT prefix.
    pub fn from_sample_field(field: &str) -> Self {
        let call = field.split(':').next().unwrap_or(field);
        Self::from_call(call)
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }

    /// The two allele strings this call expands to, or `None` when missing.
    pub fn alleles<'a>(self, reference: &'a str, alternate: &'a str) -> Option<[&'a str; 2]> {
        match self {
            Self::HomRef => Some([reference, reference]),
            Self::Het => Some([reference, alternate]),
            Self::HomAlt => Some([alternate, alternate]),
            Self::Missing => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_branch() {
        let cases = [
            ("0/0", Some(["A", "A"])),
            ("0/1", Some(["A", "T"])),
            ("1/1", Some(["T", "T"])),
            ("./.", None),
        ];
        for (call, expected) in cases {
            assert_eq!(Genotype::from_call(call).alleles("A", "T"), expected, "{call}");
        }
    }

    #[test]
    fn phased_and_swapped_calls_are_missing() {
        for call in ["0|1", "1/0", "1|1", "0/2", "2/2", ".", "", "0"] {
            assert!(Genotype::from_call(call).is_missing(), "{call}");
        }
    }

    #[test]
    fn sample_field_uses_gt_prefix() {
        assert_eq!(Genotype::from_sample_field("0/1:12,3:15"), Genotype::Het);
        assert_eq!(Genotype::from_sample_field("1/1"), Genotype::HomAlt);
        assert_eq!(Genotype::from_sample_field(":0/0"), Genotype::Missing);
    }

    #[test]
    fn multi_base_alleles_are_kept_whole() {
        assert_eq!(Genotype::HomRef.alleles("AT", "A"), Some(["AT", "AT"]));
    }
}
