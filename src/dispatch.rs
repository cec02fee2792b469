//! Invocation surface: function name plus positional string arguments
//!
//! External callers address operations by name with every argument as a
//! string, including the numeric ones. This module validates argument
//! counts, parses numerics, and routes to the ledger service. Query results
//! come back as JSON values so they can be printed or shipped as-is.

use crate::asset::Asset;
use crate::error::{LedgerError, Result};
use crate::ledger::AssetContract;
use crate::store::StateStore;
use serde_json::Value;
use tracing::debug;

fn parse_amount(function: &str, value: &str) -> Result<f64> {
    value.parse::<f64>().map_err(|e| {
        LedgerError::Serialization(format!(
            "{}: numeric argument '{}' did not parse: {}",
            function, value, e
        ))
    })
}

fn expect_args(function: &str, args: &[String], count: usize) -> Result<()> {
    if args.len() != count {
        return Err(LedgerError::InvalidArgument(format!(
            "{} expects {} argument(s), got {}",
            function,
            count,
            args.len()
        )));
    }
    Ok(())
}

/// Route one named invocation to the ledger. Mutations return `Value::Null`;
/// queries return their result as JSON.
pub fn invoke(
    ledger: &dyn AssetContract,
    store: &dyn StateStore,
    function: &str,
    args: &[String],
) -> Result<Value> {
    debug!("Invoking {} with {} argument(s)", function, args.len());
    match function {
        "CreateAsset" => {
            expect_args(function, args, 9)?;
            let asset = Asset {
                dealer_id: args[1].clone(),
                msisdn: args[2].clone(),
                mpin: args[3].clone(),
                balance: parse_amount(function, &args[4])?,
                status: args[5].clone(),
                trans_amount: parse_amount(function, &args[6])?,
                trans_type: args[7].clone(),
                remarks: args[8].clone(),
            };
            ledger.create_asset(store, &args[0], asset)?;
            Ok(Value::Null)
        }
        "ReadAsset" => {
            expect_args(function, args, 1)?;
            let asset = ledger.read_asset(store, &args[0])?;
            Ok(serde_json::to_value(asset)?)
        }
        "UpdateBalance" => {
            expect_args(function, args, 2)?;
            let new_balance = parse_amount(function, &args[1])?;
            ledger.update_balance(store, &args[0], new_balance)?;
            Ok(Value::Null)
        }
        "GetAllAssets" => {
            expect_args(function, args, 0)?;
            let assets = ledger.get_all_assets(store)?;
            Ok(serde_json::to_value(assets)?)
        }
        "GetHistory" => {
            expect_args(function, args, 1)?;
            let snapshots = ledger.get_history(store, &args[0])?;
            Ok(serde_json::to_value(snapshots)?)
        }
        "AssetExists" => {
            expect_args(function, args, 1)?;
            let exists = ledger.asset_exists(store, &args[0])?;
            Ok(Value::Bool(exists))
        }
        other => Err(LedgerError::InvalidArgument(format!(
            "Unknown function: {}",
            other
        ))),
    }
}
