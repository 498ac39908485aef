//! Binary point streams shared by the constellation boundary, constellation line and
//! Milky Way datasets.
//!
//! ## Format
//! A stream is a flat sequence of 8-byte records, each a pair of big-endian IEEE-754
//! single-precision floats `(ra, dec)`:
//! - `ra >= 0`: a point, right ascension in hours `[0, 24)` and declination in degrees.
//! - `ra == -1`: end of a section.
//! - `ra == -2`: end of the stream. Must be the final record.
//!
//! Markers carry `dec == 0`. Sections are the runs of points between markers.
//! In the Milky Way stream the first point of every section is not drawn; it is the
//! section's center, and every other point of the section lies within a fixed radius of it.

use std::f64::consts::PI;
use std::io::{Read, Write};
use std::ops::Range;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use log::trace;

use crate::error::{LoadError, Result};

/// Size of one `(ra, dec)` record in bytes.
pub const RECORD_LEN: usize = 8;

const SECTION_END: f32 = -1.0;
const STREAM_END: f32 = -2.0;

/// A position as stored in a stream: right ascension in hours, declination in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RaDec {
    /// Right ascension in hours.
    pub ra: f32,
    /// Declination in degrees.
    pub dec: f32,
}

impl RaDec {
    /// Position from hours and degrees.
    pub fn new(ra: f32, dec: f32) -> Self {
        Self { ra, dec }
    }

    /// Right ascension in radians.
    pub fn ra_radians(&self) -> f64 {
        f64::from(self.ra) * PI / 12.
    }

    /// Declination in radians.
    pub fn dec_radians(&self) -> f64 {
        f64::from(self.dec).to_radians()
    }
}

/// One decoded record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Entry {
    /// A point to be drawn.
    Point(RaDec),
    /// The center of a section, used only for visibility tests.
    CenterPoint(RaDec),
    /// End of a section.
    SectionEnd,
    /// End of the stream.
    StreamEnd,
}

impl Entry {
    /// The `(ra, dec)` record this entry is stored as.
    pub fn record(&self) -> (f32, f32) {
        match self {
            Entry::Point(p) | Entry::CenterPoint(p) => (p.ra, p.dec),
            Entry::SectionEnd => (SECTION_END, 0.),
            Entry::StreamEnd => (STREAM_END, 0.),
        }
    }
}

/// How the points of a section are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SectionLayout {
    /// Every point is drawn.
    #[default]
    Plain,
    /// The first point of every section is a [`Entry::CenterPoint`].
    Centered,
}

/// An immutable, decoded point stream.
///
/// A non-empty stream always ends with [`Entry::StreamEnd`]. The empty stream stands in
/// for a dataset that failed to load and draws nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointStream {
    entries: Vec<Entry>,
    /// Entry ranges between markers, markers excluded. Empty sections are not listed.
    sections: Vec<Range<usize>>,
}

impl PointStream {
    /// The empty stream.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a whole resource and decode it.
    pub fn decode<R: Read>(mut reader: R, layout: SectionLayout) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes, layout)
    }

    /// Decode a stream held in memory.
    pub fn from_bytes(bytes: &[u8], layout: SectionLayout) -> Result<Self> {
        if bytes.len() % RECORD_LEN != 0 {
            return Err(LoadError::Truncated {
                len: bytes.len(),
                record: RECORD_LEN,
            });
        }
        let records = bytes.len() / RECORD_LEN;

        let mut cursor = bytes;
        let mut entries = Vec::with_capacity(records);
        let mut section_start = true;
        for index in 0..records {
            let ra = cursor.read_f32::<BigEndian>()?;
            let dec = cursor.read_f32::<BigEndian>()?;

            let entry = if ra == SECTION_END {
                Entry::SectionEnd
            } else if ra == STREAM_END {
                if index + 1 != records {
                    return Err(LoadError::EarlyStreamEnd { index, records });
                }
                Entry::StreamEnd
            } else if ra >= 0. {
                let point = RaDec::new(ra, dec);
                if section_start && layout == SectionLayout::Centered {
                    Entry::CenterPoint(point)
                } else {
                    Entry::Point(point)
                }
            } else {
                return Err(LoadError::InvalidRecord { index, ra });
            };

            section_start = entry == Entry::SectionEnd;
            entries.push(entry);
        }

        if entries.last() != Some(&Entry::StreamEnd) {
            return Err(LoadError::MissingStreamEnd { records });
        }

        let stream = Self::from_entries(entries);
        trace!(
            "Decoded {} records in {} sections.",
            stream.len(),
            stream.section_count()
        );
        Ok(stream)
    }

    /// Build a stream from sections of points, separated by section markers and
    /// terminated by the stream end marker.
    pub fn from_sections<I, S>(sections: I, layout: SectionLayout) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = RaDec>,
    {
        let mut entries = Vec::new();
        for (i, section) in sections.into_iter().enumerate() {
            if i > 0 {
                entries.push(Entry::SectionEnd);
            }
            for (j, point) in section.into_iter().enumerate() {
                if j == 0 && layout == SectionLayout::Centered {
                    entries.push(Entry::CenterPoint(point));
                } else {
                    entries.push(Entry::Point(point));
                }
            }
        }
        entries.push(Entry::StreamEnd);
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<Entry>) -> Self {
        let mut sections = Vec::new();
        let mut start = 0;
        for (i, entry) in entries.iter().enumerate() {
            if matches!(entry, Entry::SectionEnd | Entry::StreamEnd) {
                if i > start {
                    sections.push(start..i);
                }
                start = i + 1;
            }
        }
        Self { entries, sections }
    }

    /// The decoded entries, markers included.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of records, markers included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this is the empty stream.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of point records, center points included.
    pub fn point_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Point(_) | Entry::CenterPoint(_)))
            .count()
    }

    /// Number of non-empty sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// The non-empty sections, markers excluded.
    pub fn sections(&self) -> impl Iterator<Item = &[Entry]> {
        self.sections.iter().map(|r| &self.entries[r.clone()])
    }

    /// The raw `(ra, dec)` records, markers included.
    pub fn records(&self) -> impl Iterator<Item = (f32, f32)> {
        self.entries.iter().map(Entry::record)
    }

    /// Encode the stream in the binary format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0; self.len() * RECORD_LEN];
        for (chunk, (ra, dec)) in bytes.chunks_exact_mut(RECORD_LEN).zip(self.records()) {
            BigEndian::write_f32(&mut chunk[..4], ra);
            BigEndian::write_f32(&mut chunk[4..], dec);
        }
        bytes
    }

    /// Write the stream in the binary format.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use byteorder::WriteBytesExt;

    use super::*;

    fn encode(records: &[(f32, f32)]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (ra, dec) in records {
            bytes.write_f32::<BigEndian>(*ra).unwrap();
            bytes.write_f32::<BigEndian>(*dec).unwrap();
        }
        bytes
    }

    #[test]
    fn decode_points() {
        let points = [(0.5, -12.25), (23.75, 89.5), (6., 0.), (12.125, -90.)];
        let mut records = points.to_vec();
        records.push((-2., 0.));

        let stream = PointStream::decode(encode(&records).as_slice(), SectionLayout::Plain).unwrap();
        assert_eq!(stream.point_count(), points.len());
        assert_eq!(stream.len(), records.len());
        for (entry, (ra, dec)) in stream.entries().iter().zip(points) {
            assert_eq!(*entry, Entry::Point(RaDec::new(ra, dec)));
        }
        assert_eq!(stream.entries().last(), Some(&Entry::StreamEnd));
    }

    #[test]
    fn big_endian() {
        let bytes = [
            0x3f, 0x80, 0x00, 0x00, 0x41, 0x20, 0x00, 0x00, // (1, 10)
            0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // stream end
        ];
        let stream = PointStream::from_bytes(&bytes, SectionLayout::Plain).unwrap();
        assert_eq!(stream.entries()[0], Entry::Point(RaDec::new(1., 10.)));
        assert_eq!(stream.to_bytes(), bytes);
    }

    #[test]
    fn missing_stream_end() {
        let bytes = encode(&[(1., 2.), (3., 4.), (-1., 0.)]);
        let err = PointStream::from_bytes(&bytes, SectionLayout::Plain).unwrap_err();
        assert!(matches!(err, LoadError::MissingStreamEnd { records: 3 }));

        let err = PointStream::from_bytes(&[], SectionLayout::Plain).unwrap_err();
        assert!(matches!(err, LoadError::MissingStreamEnd { records: 0 }));
    }

    #[test]
    fn truncated() {
        let mut bytes = encode(&[(1., 2.), (-2., 0.)]);
        bytes.pop();
        let err = PointStream::from_bytes(&bytes, SectionLayout::Plain).unwrap_err();
        assert!(matches!(err, LoadError::Truncated { len: 15, record: 8 }));
    }

    #[test]
    fn early_stream_end() {
        let bytes = encode(&[(1., 2.), (-2., 0.), (3., 4.), (-2., 0.)]);
        let err = PointStream::from_bytes(&bytes, SectionLayout::Plain).unwrap_err();
        assert!(matches!(err, LoadError::EarlyStreamEnd { index: 1, records: 4 }));
    }

    #[test]
    fn invalid_record() {
        let bytes = encode(&[(1., 2.), (-0.5, 4.), (-2., 0.)]);
        let err = PointStream::from_bytes(&bytes, SectionLayout::Plain).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRecord { index: 1, .. }));

        let bytes = encode(&[(f32::NAN, 2.), (-2., 0.)]);
        assert!(PointStream::from_bytes(&bytes, SectionLayout::Plain).is_err());
    }

    #[test]
    fn sections() {
        let bytes = encode(&[
            (1., 1.),
            (2., 2.),
            (-1., 0.),
            (-1., 0.),
            (3., 3.),
            (4., 4.),
            (5., 5.),
            (-1., 0.),
            (-2., 0.),
        ]);
        let stream = PointStream::from_bytes(&bytes, SectionLayout::Centered).unwrap();
        assert_eq!(stream.section_count(), 2);

        let sections: Vec<&[Entry]> = stream.sections().collect();
        assert_eq!(
            sections[0],
            [
                Entry::CenterPoint(RaDec::new(1., 1.)),
                Entry::Point(RaDec::new(2., 2.))
            ]
        );
        assert_eq!(sections[1].len(), 3);
        assert_eq!(sections[1][0], Entry::CenterPoint(RaDec::new(3., 3.)));
        assert_eq!(sections[1][2], Entry::Point(RaDec::new(5., 5.)));

        let plain = PointStream::from_bytes(&bytes, SectionLayout::Plain).unwrap();
        assert_eq!(plain.sections().next().unwrap()[0], Entry::Point(RaDec::new(1., 1.)));
    }

    #[test]
    fn from_sections() {
        let stream = PointStream::from_sections(
            [
                vec![RaDec::new(1., 1.), RaDec::new(2., 2.)],
                vec![RaDec::new(3., 3.)],
            ],
            SectionLayout::Plain,
        );
        let records: Vec<(f32, f32)> = stream.records().collect();
        assert_eq!(records, [(1., 1.), (2., 2.), (-1., 0.), (3., 3.), (-2., 0.)]);

        let mut bytes = Vec::new();
        stream.write_to(&mut bytes).unwrap();
        let decoded = PointStream::from_bytes(&bytes, SectionLayout::Plain).unwrap();
        assert_eq!(decoded, stream);
    }

    #[test]
    fn radians() {
        let p = RaDec::new(6., -45.);
        assert_abs_diff_eq!(p.ra_radians(), PI / 2., epsilon = 1e-12);
        assert_abs_diff_eq!(p.dec_radians(), -PI / 4., epsilon = 1e-12);
    }
}
