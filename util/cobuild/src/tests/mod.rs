use ckb_hash::blake2b_256;
use ckb_spore_codec::{
    Address, BuildingPacket, Codec, CreateSpore, SporeAction, TransferClusterProxy, WitnessKind,
    WitnessLayout, classify_witness,
};
use ckb_spore_error::ErrorKind;
use ckb_spore_skeleton::TransactionSkeleton;
use ckb_spore_traits::Cell;
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, ScriptHashType},
    packed::{self, OutPoint, Script},
    prelude::*,
};
use pretty_assertions::assert_eq;

use crate::{
    assemble_building_packet, create_spore_action, find_cobuild_message, inject_cobuild_proof,
    melt_spore_action, script_info_hash, spore_script_info, transfer_cluster_proxy_action,
    unpack_spore_action,
};

const CKB: u64 = 100_000_000;

fn script(seed: u8, args: Vec<u8>) -> Script {
    packed::Script::new_builder()
        .code_hash([seed; 32].pack())
        .hash_type(ScriptHashType::Data1.into())
        .args(Bytes::from(args).pack())
        .build()
}

fn cell(lock: Script, type_: Option<Script>, data: Bytes) -> Cell {
    let output = packed::CellOutput::new_builder()
        .capacity(Capacity::shannons(500 * CKB).pack())
        .lock(lock)
        .build();
    Cell::new(output, data).with_type(type_)
}

fn spore_type(id: u8) -> Script {
    script(0xaa, vec![id; 32])
}

fn skeleton_with_spore() -> TransactionSkeleton {
    let funding = cell(script(1, vec![1; 20]), None, Bytes::new())
        .with_out_point(OutPoint::new([1u8; 32].pack(), 0));
    TransactionSkeleton::new()
        .add_input(funding, 0)
        .unwrap()
        .add_output(cell(
            script(2, vec![2; 20]),
            Some(spore_type(7)),
            Bytes::from_static(b"spore data"),
        ))
}

#[test]
fn create_spore_action_reads_output() {
    let skeleton = skeleton_with_spore();
    let action = create_spore_action(&skeleton, 0).unwrap();
    let expected_hash: [u8; 32] = spore_type(7).calc_script_hash().unpack();
    assert_eq!(action.script_hash, expected_hash);
    assert_eq!(
        action.script_info_hash,
        script_info_hash(&spore_script_info(expected_hash))
    );
    assert_eq!(
        unpack_spore_action(&action).unwrap(),
        SporeAction::CreateSpore(CreateSpore {
            spore_id: [7; 32],
            to: Address::from(script(2, vec![2; 20])),
            data_hash: blake2b_256(b"spore data"),
        })
    );
}

#[test]
fn script_info_follows_the_deployment() {
    let deployment = |code_hash: u8| {
        let spore = script(code_hash, vec![7; 32]);
        let skeleton = TransactionSkeleton::new().add_output(cell(
            script(2, vec![2; 20]),
            Some(spore),
            Bytes::new(),
        ));
        create_spore_action(&skeleton, 0).unwrap()
    };
    let preview = deployment(0xaa);
    let latest = deployment(0xbb);
    assert_ne!(preview.script_info_hash, latest.script_info_hash);
    assert_ne!(preview.script_info_hash, script_info_hash(&spore_script_info([0; 32])));
    assert_eq!(spore_script_info(latest.script_hash).script_hash, latest.script_hash);
}

#[test]
fn proof_is_appended_after_input_witnesses() {
    let skeleton = skeleton_with_spore();
    let action = create_spore_action(&skeleton, 0).unwrap();
    let skeleton = inject_cobuild_proof(skeleton, vec![action.clone()]).unwrap();

    assert_eq!(skeleton.witnesses().len(), 2);
    assert_eq!(
        classify_witness(&skeleton.witnesses()[0]),
        WitnessKind::Legacy
    );
    let layout = WitnessLayout::unpack(&skeleton.witnesses()[1]).unwrap();
    assert_eq!(layout.message().unwrap().actions, vec![action.clone()]);

    // a second injection extends the same message
    let skeleton = inject_cobuild_proof(skeleton, vec![action.clone()]).unwrap();
    assert_eq!(skeleton.witnesses().len(), 2);
    let message = find_cobuild_message(&skeleton).unwrap().unwrap();
    assert_eq!(message.actions.len(), 2);
}

#[test]
fn proof_needs_an_input() {
    let skeleton = TransactionSkeleton::new().add_output(cell(
        script(2, vec![2; 20]),
        Some(spore_type(7)),
        Bytes::new(),
    ));
    assert_eq!(
        inject_cobuild_proof(skeleton, Vec::new())
            .unwrap_err()
            .kind(),
        ErrorKind::InvariantViolation
    );
}

#[test]
fn proof_rejects_foreign_actions() {
    let skeleton = skeleton_with_spore();
    let mut action = create_spore_action(&skeleton, 0).unwrap();
    action.script_hash = [0xee; 32];
    assert_eq!(
        inject_cobuild_proof(skeleton, vec![action])
            .unwrap_err()
            .kind(),
        ErrorKind::InvariantViolation
    );
}

#[test]
fn melt_action_reads_input() {
    let spore = cell(script(2, vec![2; 20]), Some(spore_type(9)), Bytes::new())
        .with_out_point(OutPoint::new([9u8; 32].pack(), 1));
    let skeleton = TransactionSkeleton::new().add_input(spore, 0).unwrap();
    let action = melt_spore_action(&skeleton, 0).unwrap();
    match unpack_spore_action(&action).unwrap() {
        SporeAction::MeltSpore(melt) => {
            assert_eq!(melt.spore_id, [9; 32]);
            assert_eq!(melt.from.script(), &script(2, vec![2; 20]));
        }
        other => panic!("unexpected action {}", other.item_name()),
    }
    assert!(melt_spore_action(&skeleton, 1).is_err());
}

#[test]
fn proxy_action_reads_cluster_from_data() {
    let mut args = vec![5u8; 32];
    args.push(10);
    let proxy_type = script(0xbb, args);
    let proxy = cell(
        script(2, vec![2; 20]),
        Some(proxy_type.clone()),
        Bytes::from(vec![4u8; 32]),
    );
    let skeleton = TransactionSkeleton::new()
        .add_input(proxy.clone().with_out_point(OutPoint::new([3u8; 32].pack(), 0)), 0)
        .unwrap()
        .add_output(proxy.with_lock(script(3, vec![3; 20])));
    let action = transfer_cluster_proxy_action(&skeleton, 0, 0).unwrap();
    assert_eq!(
        unpack_spore_action(&action).unwrap(),
        SporeAction::TransferClusterProxy(TransferClusterProxy {
            cluster_id: [4; 32],
            cluster_proxy_id: [5; 32],
            from: Address::from(script(2, vec![2; 20])),
            to: Address::from(script(3, vec![3; 20])),
        })
    );
}

#[test]
fn building_packet_carries_message() {
    let skeleton = skeleton_with_spore();
    let action = create_spore_action(&skeleton, 0).unwrap();
    let skeleton = inject_cobuild_proof(skeleton, vec![action.clone()]).unwrap();
    let info = spore_script_info(action.script_hash);
    let packet = assemble_building_packet(&skeleton, vec![info.clone()]).unwrap();
    let BuildingPacket::V1(packet) = BuildingPacket::unpack(&packet.pack()).unwrap();
    assert_eq!(packet.message.actions.len(), 1);
    assert_eq!(packet.resolved_inputs.outputs.len(), 1);
    assert_eq!(packet.script_infos, vec![info]);
    assert_eq!(packet.change_output, None);
    assert_eq!(
        packet.payload.as_slice(),
        skeleton.to_transaction_view().unwrap().data().as_slice()
    );
}
