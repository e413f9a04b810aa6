//! The fixed contract interface, embedded at compile time.

use ethers::abi::Abi;
use ethers::types::H256;

use crate::contract::ContractError;

pub const GET_ALL_JOBS: &str = "getAllJobs";
pub const GET_JOB: &str = "getJob";
pub const GET_CANDIDATE: &str = "getCandidate";
pub const GET_ALL_APPLICATIONS: &str = "getAllApplications";
pub const SUBMIT_APPLICATION: &str = "submitApplication";
pub const APPLICATION_SUBMITTED: &str = "ApplicationSubmitted";

const JOB_BOARD_ABI: &str = include_str!("../../abi/job_board.json");

pub fn load_abi() -> Result<Abi, ContractError> {
    serde_json::from_str(JOB_BOARD_ABI).map_err(|e| ContractError::Abi(e.to_string()))
}

/// topic0 of the `ApplicationSubmitted` event.
pub fn application_submitted_topic(abi: &Abi) -> Result<H256, ContractError> {
    abi.event(APPLICATION_SUBMITTED)
        .map(|event| event.signature())
        .map_err(|e| ContractError::Abi(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_abi_declares_required_functions() {
        let abi = load_abi().unwrap();
        for name in [
            GET_ALL_JOBS,
            GET_JOB,
            GET_CANDIDATE,
            GET_ALL_APPLICATIONS,
            SUBMIT_APPLICATION,
        ] {
            assert!(abi.function(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn test_submit_application_takes_four_strings() {
        let abi = load_abi().unwrap();
        let function = abi.function(SUBMIT_APPLICATION).unwrap();
        assert_eq!(function.inputs.len(), 4);
    }

    #[test]
    fn test_event_topic_matches_signature_hash() {
        let abi = load_abi().unwrap();
        let topic = application_submitted_topic(&abi).unwrap();
        let expected = H256::from(ethers::utils::keccak256(
            "ApplicationSubmitted(string,string,string)",
        ));
        assert_eq!(topic, expected);
    }
}
