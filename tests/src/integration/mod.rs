//! Cross-crate integration flows.

#[cfg(test)]
mod account_flow;
#[cfg(test)]
mod contract_flow;
#[cfg(test)]
mod deployment_phases;
#[cfg(test)]
mod session_config;

#[cfg(test)]
mod fixtures;
