use anyhow::{anyhow, Context};
use quaestor_protocol::Corpus;
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use rkyv::{AlignedVec, Deserialize};

/// JSON corpus text -> rkyv archive bytes.
pub fn compile_json(json: &str) -> anyhow::Result<AlignedVec> {
    let corpus: Corpus = serde_json::from_str(json).context("corpus JSON does not match the Corpus schema")?;

    let mut serializer = AllocSerializer::<256>::default();
    serializer
        .serialize_value(&corpus)
        .map_err(|e| anyhow!("failed to archive corpus: {:?}", e))?;
    Ok(serializer.into_serializer().into_inner())
}

/// Validates archive bytes and reads the corpus back.
pub fn load(bytes: &[u8]) -> anyhow::Result<Corpus> {
    // fs::read gives no alignment guarantee; the archive root needs one.
    let mut aligned = AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);

    let archived = rkyv::check_archived_root::<Corpus>(&aligned)
        .map_err(|e| anyhow!("corrupt corpus archive: {:?}", e))?;
    archived
        .deserialize(&mut rkyv::Infallible)
        .map_err(|_| anyhow!("failed to read corpus archive"))
}
