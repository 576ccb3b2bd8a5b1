//! Request and response envelopes.
//!
//! The API wraps every payload in a `data` object:
//! `{"data":{"shipments":[...]}}` going out, `{"data":{"ids":[...]}}` or
//! `{"data":{"shipments":[...],"results":n}}` coming back.

use crate::models::{CreatedShipment, FetchResult, Shipment};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Serialize)]
struct ShipmentBatch<'a> {
    shipments: &'a [Shipment],
}

#[derive(Deserialize)]
struct CreatedIds {
    ids: Vec<CreatedShipment>,
}

/// Encode `shipments` as a create-request body.
pub fn encode_create_request(shipments: &[Shipment]) -> Result<Vec<u8>> {
    serde_json::to_vec(&Envelope {
        data: ShipmentBatch { shipments },
    })
    .map_err(|e| Error::Encoding(e.to_string()))
}

/// Decode the ids assigned by a create call, in request order.
pub fn decode_create_response(body: &[u8]) -> Result<Vec<CreatedShipment>> {
    let envelope: Envelope<CreatedIds> =
        serde_json::from_slice(body).map_err(|e| Error::Decoding(e.to_string()))?;
    Ok(envelope.data.ids)
}

/// Decode the shipments returned by a fetch call.
pub fn decode_fetch_response(body: &[u8]) -> Result<FetchResult> {
    let envelope: Envelope<FetchResult> =
        serde_json::from_slice(body).map_err(|e| Error::Decoding(e.to_string()))?;
    Ok(envelope.data)
}
