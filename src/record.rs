use crate::error::RecordError;

pub const FLAG_FIELD: usize = 1;
pub const CIGAR_FIELD: usize = 5;
pub const SCORE_FIELD: usize = 13;

// The score value starts after the "AS:i:" tag prefix
pub const SCORE_VALUE_OFFSET: usize = 5;

pub const PRIMARY_FORWARD_FLAG: i64 = 0;
pub const PRIMARY_REVERSE_FLAG: i64 = 16;

/// One tab-separated alignment line, split but otherwise untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord<'a> {
    fields: Vec<&'a str>,
    pub flag: i64,
}

impl<'a> AlignmentRecord<'a> {
    pub fn parse(line: &'a str) -> Result<AlignmentRecord<'a>, RecordError> {
        let fields: Vec<&'a str> = line.split('\t').collect();

        let flag_field = *fields.get(FLAG_FIELD).ok_or(RecordError::MissingField {
            expected: FLAG_FIELD + 1,
            found: fields.len(),
        })?;

        let flag = flag_field
            .trim()
            .parse::<i64>()
            .map_err(|_| RecordError::InvalidFlag(flag_field.to_string()))?;

        Ok(AlignmentRecord { fields, flag })
    }

    // Forward or reverse primary alignment with no other flag bits set
    pub fn is_primary(&self) -> bool {
        self.flag == PRIMARY_FORWARD_FLAG || self.flag == PRIMARY_REVERSE_FLAG
    }

    pub fn cigar(&self) -> Result<&'a str, RecordError> {
        self.field(CIGAR_FIELD)
    }

    pub fn score(&self) -> Result<i64, RecordError> {
        let tag = self.field(SCORE_FIELD)?;

        tag.get(SCORE_VALUE_OFFSET..)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .ok_or_else(|| RecordError::InvalidScore(tag.to_string()))
    }

    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }

    pub fn to_line(&self) -> String {
        self.fields.join("\t")
    }

    fn field(&self, idx: usize) -> Result<&'a str, RecordError> {
        self.fields
            .get(idx)
            .copied()
            .ok_or(RecordError::MissingField {
                expected: idx + 1,
                found: self.fields.len(),
            })
    }
}
