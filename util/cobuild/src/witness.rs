use std::collections::HashSet;

use ckb_logger::debug;
use ckb_spore_codec::{
    Action, BuildingPacket, BuildingPacketV1, Codec, Message, ResolvedInputs, SIGHASH_ALL_ITEM_ID,
    ScriptInfo, SighashAll, WitnessKind, WitnessLayout, classify_witness,
};
use ckb_spore_error::{Error, Result};
use ckb_spore_skeleton::TransactionSkeleton;
use ckb_types::{bytes::Bytes, prelude::*};

/// Type script hashes of every input and output.
fn type_script_hashes(skeleton: &TransactionSkeleton) -> HashSet<[u8; 32]> {
    skeleton
        .inputs()
        .iter()
        .chain(skeleton.outputs())
        .filter_map(|cell| cell.type_())
        .map(|script| script.calc_script_hash().unpack())
        .collect()
}

/// Index of the trailing `SighashAll` witness, if any.
fn layout_index(skeleton: &TransactionSkeleton) -> Option<usize> {
    skeleton
        .witnesses()
        .iter()
        .enumerate()
        .skip(skeleton.inputs().len())
        .find(|(_, witness)| classify_witness(witness) == WitnessKind::Layout(SIGHASH_ALL_ITEM_ID))
        .map(|(index, _)| index)
}

/// The message sealed in the skeleton's trailing `SighashAll` witness.
pub fn find_cobuild_message(skeleton: &TransactionSkeleton) -> Result<Option<Message>> {
    let Some(index) = layout_index(skeleton) else {
        return Ok(None);
    };
    let layout = WitnessLayout::unpack(&skeleton.witnesses()[index])?;
    Ok(layout.message().cloned())
}

/// Seals `actions` into a `SighashAll` witness after the input witnesses,
/// extending the message of an existing one.
///
/// Each action must govern a type script present in the transaction. The
/// seal is left empty for the signer.
pub fn inject_cobuild_proof(
    skeleton: TransactionSkeleton,
    actions: Vec<Action>,
) -> Result<TransactionSkeleton> {
    if skeleton.inputs().is_empty() {
        return Err(Error::invariant(
            "cannot seal cobuild actions into a transaction without inputs",
        ));
    }
    let hashes = type_script_hashes(&skeleton);
    if let Some(orphan) = actions
        .iter()
        .find(|action| !hashes.contains(&action.script_hash))
    {
        return Err(Error::invariant(format!(
            "action governs script {} which is absent from the transaction",
            faster_hex::hex_string(&orphan.script_hash)
        )));
    }

    let mut message = find_cobuild_message(&skeleton)?.unwrap_or_default();
    message.actions.extend(actions);
    debug!("seal {} cobuild actions", message.actions.len());
    let witness = WitnessLayout::SighashAll(SighashAll {
        message,
        seal: Bytes::new(),
    })
    .pack();
    match layout_index(&skeleton) {
        Some(index) => skeleton.set_witness(index, witness),
        None => Ok(skeleton.push_witness(witness)),
    }
}

/// Packs what a co-builder needs to continue the transaction.
pub fn assemble_building_packet(
    skeleton: &TransactionSkeleton,
    script_infos: Vec<ScriptInfo>,
) -> Result<BuildingPacket> {
    let message = find_cobuild_message(skeleton)?.unwrap_or_default();
    let resolved_inputs = ResolvedInputs {
        outputs: skeleton
            .inputs()
            .iter()
            .map(|cell| cell.output.clone())
            .collect(),
        outputs_data: skeleton.inputs().iter().map(|cell| cell.data.clone()).collect(),
    };
    let change_output = skeleton
        .change_output()
        .map(|index| {
            u32::try_from(index).map_err(|_| Error::invariant("change output index overflows"))
        })
        .transpose()?;
    Ok(BuildingPacket::V1(BuildingPacketV1 {
        message,
        payload: skeleton.to_transaction_view()?.data(),
        resolved_inputs,
        change_output,
        script_infos,
        lock_actions: Vec::new(),
    }))
}
