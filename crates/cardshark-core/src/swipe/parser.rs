use super::error::DecodeError;
use super::layout;
use super::reader::SwipeReader;
use crate::{EncodingType, SwipeRecord, Track};

/// Decode one complete swipe buffer into a structured record.
///
/// Pure and side-effect free: the same buffer always yields the same record.
/// Field parsing applies only to ISO/ABA swipes; other formats keep raw
/// track data tagged with the format name.
pub fn decode_swipe(buffer: &[u8]) -> Result<SwipeRecord, DecodeError> {
    let reader = SwipeReader::new(buffer);
    reader.require_len(layout::MIN_LEN)?;

    let index = reader.read_u8(layout::ENCODING_TYPE_OFFSET)?;
    let encoding_type = EncodingType::from_index(index)
        .ok_or(DecodeError::UnknownEncodingType { value: index })?;

    let mut tracks: [Track; layout::TRACK_COUNT] = Default::default();
    let mut offset = layout::TRACK_DATA_OFFSET;

    for (index, track) in tracks.iter_mut().enumerate() {
        track.length = reader.read_u8(layout::TRACK_LENGTH_OFFSETS[index])?;
        if track.length == 0 {
            continue;
        }

        // The extra byte is the trailing separator, consumed but not kept.
        let end = offset + track.length as usize + 1;
        track.data = reader.read_track_text(offset..end)?;
        offset = end;

        if track.data.is_empty() {
            continue;
        }

        if encoding_type == EncodingType::IsoAba {
            match index {
                0 => parse_iso_track0(index, track)?,
                1 => parse_iso_track1(index, track)?,
                _ => {}
            }
        }
    }

    Ok(SwipeRecord {
        encoding_type,
        tracks,
    })
}

fn parse_iso_track0(index: usize, track: &mut Track) -> Result<(), DecodeError> {
    let chars: Vec<char> = track.data.chars().collect();

    let format_code_offset =
        find_from(&chars, '%', 0).ok_or(DecodeError::DelimiterNotFound {
            track: index,
            delimiter: '%',
        })?;
    let name_offset = find_from(&chars, '^', format_code_offset + 1).ok_or(
        DecodeError::DelimiterNotFound {
            track: index,
            delimiter: '^',
        },
    )?;
    let additional_data_offset = find_from(&chars, '^', name_offset + 1).ok_or(
        DecodeError::DelimiterNotFound {
            track: index,
            delimiter: '^',
        },
    )?;

    let format_code = chars.get(format_code_offset + 1).copied().ok_or(
        DecodeError::TruncatedField {
            track: index,
            field: "format_code",
        },
    )?;
    let primary_account_number = char_range(
        &chars,
        format_code_offset + 2..name_offset,
        index,
        "primary_account_number",
    )?;

    let name = char_range(&chars, name_offset + 1..additional_data_offset, index, "name")?;
    let (last_name, first_name) = match name.split_once('/') {
        Some((last, first)) if !first.contains('/') => (last.to_string(), first.to_string()),
        _ => {
            return Err(DecodeError::MalformedName { track: index, name });
        }
    };

    track.expiration_year = Some(char_range(
        &chars,
        additional_data_offset + 1..additional_data_offset + 3,
        index,
        "expiration_year",
    )?);
    track.expiration_month = Some(char_range(
        &chars,
        additional_data_offset + 3..additional_data_offset + 5,
        index,
        "expiration_month",
    )?);

    track.format_code = Some(format_code);
    track.primary_account_number = Some(primary_account_number);
    track.name = Some(name);
    track.last_name = Some(last_name);
    track.first_name = Some(first_name);
    Ok(())
}

fn parse_iso_track1(index: usize, track: &mut Track) -> Result<(), DecodeError> {
    let chars: Vec<char> = track.data.chars().collect();

    let primary_account_number_offset =
        find_from(&chars, ';', 0).ok_or(DecodeError::DelimiterNotFound {
            track: index,
            delimiter: ';',
        })?;
    let additional_data_offset = find_from(&chars, '=', primary_account_number_offset + 1)
        .ok_or(DecodeError::DelimiterNotFound {
            track: index,
            delimiter: '=',
        })?;

    track.primary_account_number = Some(char_range(
        &chars,
        primary_account_number_offset + 1..additional_data_offset,
        index,
        "primary_account_number",
    )?);
    track.expiration_year = Some(char_range(
        &chars,
        additional_data_offset + 1..additional_data_offset + 3,
        index,
        "expiration_year",
    )?);
    track.expiration_month = Some(char_range(
        &chars,
        additional_data_offset + 3..additional_data_offset + 5,
        index,
        "expiration_month",
    )?);
    Ok(())
}

fn find_from(chars: &[char], needle: char, from: usize) -> Option<usize> {
    chars
        .iter()
        .enumerate()
        .skip(from)
        .find(|&(_, &c)| c == needle)
        .map(|(pos, _)| pos)
}

fn char_range(
    chars: &[char],
    range: std::ops::Range<usize>,
    track: usize,
    field: &'static str,
) -> Result<String, DecodeError> {
    chars
        .get(range)
        .map(|slice| slice.iter().collect())
        .ok_or(DecodeError::TruncatedField { track, field })
}
