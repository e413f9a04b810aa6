//! Positional decoding of contract structs from ABI tokens.
//!
//! Field order mirrors the Solidity structs:
//! - Job: jobId, companyId, title, description, requirements, skills, location,
//!   salaryRange, jobType, status
//! - Candidate: candidateId, name, description, contacts, education, skills,
//!   resumePath, profileScore
//! - Application: applicationId, jobId, candidateId, applicationDate, status

use ethers::abi::Token;

use crate::contract::ContractError;
use crate::models::{
    Application, ApplicationStatus, Candidate, Job, JobStatus, JobType, Location,
};

pub fn decode_job(token: Token) -> Result<Job, ContractError> {
    let mut f = tuple(token, 10, "Job")?.into_iter();
    Ok(Job {
        job_id: string(next(&mut f)?)?,
        company_id: string(next(&mut f)?)?,
        title: string(next(&mut f)?)?,
        description: string(next(&mut f)?)?,
        requirements: strings(next(&mut f)?)?,
        skills: strings(next(&mut f)?)?,
        location: Location::from_index(index(next(&mut f)?)?),
        salary_range: strings(next(&mut f)?)?,
        job_type: JobType::from_index(index(next(&mut f)?)?),
        status: JobStatus::from_index(index(next(&mut f)?)?),
    })
}

pub fn decode_candidate(token: Token) -> Result<Candidate, ContractError> {
    let mut f = tuple(token, 8, "Candidate")?.into_iter();
    Ok(Candidate {
        candidate_id: string(next(&mut f)?)?,
        name: string(next(&mut f)?)?,
        description: strings(next(&mut f)?)?,
        contacts: strings(next(&mut f)?)?,
        education: strings(next(&mut f)?)?,
        skills: strings(next(&mut f)?)?,
        resume_path: strings(next(&mut f)?)?,
        profile_score: string(next(&mut f)?)?,
    })
}

pub fn decode_application(token: Token) -> Result<Application, ContractError> {
    let mut f = tuple(token, 5, "Application")?.into_iter();
    Ok(Application {
        application_id: string(next(&mut f)?)?,
        job_id: string(next(&mut f)?)?,
        candidate_id: string(next(&mut f)?)?,
        application_date: string(next(&mut f)?)?,
        status: ApplicationStatus::from_index(index(next(&mut f)?)?),
    })
}

/// Decodes a dynamic array of structs. One bad row fails the whole array.
pub fn decode_list<T>(
    token: Token,
    decode: fn(Token) -> Result<T, ContractError>,
) -> Result<Vec<T>, ContractError> {
    match token {
        Token::Array(items) | Token::FixedArray(items) => items.into_iter().map(decode).collect(),
        other => Err(ContractError::Decode(format!("expected array, got {other:?}"))),
    }
}

fn tuple(token: Token, arity: usize, what: &str) -> Result<Vec<Token>, ContractError> {
    match token {
        Token::Tuple(fields) if fields.len() == arity => Ok(fields),
        Token::Tuple(fields) => Err(ContractError::Decode(format!(
            "{what} has {} fields, expected {arity}",
            fields.len()
        ))),
        other => Err(ContractError::Decode(format!(
            "expected {what} tuple, got {other:?}"
        ))),
    }
}

fn next(fields: &mut impl Iterator<Item = Token>) -> Result<Token, ContractError> {
    fields
        .next()
        .ok_or_else(|| ContractError::Decode("tuple ended early".to_string()))
}

fn string(token: Token) -> Result<String, ContractError> {
    match token {
        Token::String(s) => Ok(s),
        other => Err(ContractError::Decode(format!("expected string, got {other:?}"))),
    }
}

fn strings(token: Token) -> Result<Vec<String>, ContractError> {
    match token {
        Token::Array(items) | Token::FixedArray(items) => items.into_iter().map(string).collect(),
        other => Err(ContractError::Decode(format!(
            "expected string[], got {other:?}"
        ))),
    }
}

/// `uint8` enum discriminant.
fn index(token: Token) -> Result<u64, ContractError> {
    match token {
        Token::Uint(value) if value.bits() <= 64 => Ok(value.as_u64()),
        other => Err(ContractError::Decode(format!("expected uint8, got {other:?}"))),
    }
}
