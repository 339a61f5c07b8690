//! Indonesian tax types tracked by worksheets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EnumeratedValue, UnknownValueError};

/// Tax type a worksheet prepares.
///
/// The serialised form is the label stored in the `worksheets.type` column.
///
/// # Examples
/// ```
/// use worksheets::domain::TaxType;
///
/// let parsed: TaxType = "PPh Final UMKM".parse().expect("known tax type");
/// assert_eq!(parsed, TaxType::PphFinalUmkm);
/// assert_eq!(TaxType::default(), TaxType::Pph21);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum TaxType {
    /// Employee income tax (Article 21).
    #[default]
    #[serde(rename = "PPh 21")]
    Pph21,
    /// Withholding on services and rent (Article 23).
    #[serde(rename = "PPh 23")]
    Pph23,
    /// Value added tax.
    #[serde(rename = "PPN")]
    Ppn,
    /// Corporate income tax.
    #[serde(rename = "PPh Badan")]
    PphBadan,
    /// Final tax for micro, small and medium enterprises.
    #[serde(rename = "PPh Final UMKM")]
    PphFinalUmkm,
}

impl TaxType {
    /// Every tax type, in catalogue order.
    pub const ALL: [Self; 5] = [
        Self::Pph21,
        Self::Pph23,
        Self::Ppn,
        Self::PphBadan,
        Self::PphFinalUmkm,
    ];

    /// Stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pph21 => "PPh 21",
            Self::Pph23 => "PPh 23",
            Self::Ppn => "PPN",
            Self::PphBadan => "PPh Badan",
            Self::PphFinalUmkm => "PPh Final UMKM",
        }
    }

    /// Catalogue description shown on the overview cards.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Pph21 => "Pajak Penghasilan Pasal 21 - Gaji Karyawan",
            Self::Pph23 => "Pajak Penghasilan Pasal 23 - Jasa dan Sewa",
            Self::Ppn => "Pajak Pertambahan Nilai",
            Self::PphBadan => "Pajak Penghasilan Badan",
            Self::PphFinalUmkm => "PPh Final berdasarkan PP 23/2018",
        }
    }
}

impl EnumeratedValue for TaxType {
    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxType {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| UnknownValueError::tax_type(s))
    }
}
