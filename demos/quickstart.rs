// Search, price, book, look up and cancel one booking against a HotelByte environment.
//
// HOTELBYTE_BASE_URL, HOTELBYTE_APP_KEY and HOTELBYTE_APP_SECRET are read from the
// environment; RUST_LOG controls log output.

use anyhow::{bail, Context};
use chrono::Utc;
use hotelbyte::{
    BookReq, CancelReq, CancellationToken, CheckAvailReq, CheckInOut, ClientConfig, DateInt,
    Guest, GuestPerRoom, Holder, HotelByteClient, HotelDestination, HotelListReq, HotelRatesReq,
    Occupancies, PageReq, Phone, QueryOrdersReq, RefundableMode, RoomRatePkg,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,hotelbyte=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_target(true)
        .init();

    let config = ClientConfig::from_env().context("reading HOTELBYTE_* environment")?;
    let client = HotelByteClient::new(config).context("creating client")?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let result = run(&client, &cancel).await;
    client.close();
    result
}

async fn run(client: &HotelByteClient, cancel: &CancellationToken) -> anyhow::Result<()> {
    let today = DateInt::from(Utc::now().date_naive());
    let stay = CheckInOut {
        check_in: today.add_days(1).context("check-in date")?,
        check_out: today.add_days(3).context("check-out date")?,
    };
    let occupancies = Occupancies {
        nationality_code: "US".to_string(),
        room_occupancies: vec![GuestPerRoom {
            adult_count: 2,
            ..Default::default()
        }],
        ..Default::default()
    };

    let search = client
        .hotel_list(
            &HotelListReq {
                destination: HotelDestination {
                    destination_name: "Dubai".to_string(),
                },
                stay,
                occupancies: occupancies.clone(),
                max_rates_per_hotel: 3,
                sort_by: "price-asc".to_string(),
                page: PageReq {
                    page_num: 1,
                    page_size: 20,
                    cursor: 0,
                },
                currency: "USD".to_string(),
                ..Default::default()
            },
            cancel,
        )
        .await
        .context("hotel search")?;
    let session_id = search.basic.session_id.clone();
    info!(hotels = search.list.len(), %session_id, "search finished");

    for hotel in search.list.iter().filter(|h| h.is_available) {
        info!(hotel_id = %hotel.id, name = %hotel.profile.name.en, min_price = hotel.min_price.amount, "fetching rates");
        let rates = client
            .hotel_rates(
                &HotelRatesReq {
                    hotel_id: hotel.id,
                    stay,
                    occupancies: occupancies.clone(),
                    currency: "USD".to_string(),
                    session_id: session_id.clone(),
                    ..Default::default()
                },
                cancel,
            )
            .await
            .context("hotel rates")?;

        let refundable = rates
            .rooms
            .iter()
            .flat_map(|room| room.rates.iter())
            .find(|rate| rate.cancel_policy.refundable_mode != RefundableMode::No);
        if let Some(rate) = refundable {
            return book_and_cancel(client, rate, &session_id, cancel).await;
        }
    }

    bail!("no refundable rate found")
}

async fn book_and_cancel(
    client: &HotelByteClient,
    rate: &RoomRatePkg,
    session_id: &str,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let avail = client
        .check_avail(
            &CheckAvailReq {
                rate_pkg_id: rate.rate_pkg_id.clone(),
                session_id: session_id.to_string(),
                ..Default::default()
            },
            cancel,
        )
        .await
        .context("check availability")?;
    if !avail.status.is_available() {
        bail!("rate {} is no longer available", rate.rate_pkg_id);
    }

    let customer_reference_no = Utc::now().timestamp().to_string();
    let guest = |first: &str, age: i64| Guest {
        room_index: 1,
        first_name: first.to_string(),
        last_name: "Doe".to_string(),
        nationality_code: "US".to_string(),
        age,
        ..Default::default()
    };
    let booked = client
        .book(
            &BookReq {
                customer_reference_no: customer_reference_no.clone(),
                rate_pkg_id: rate.rate_pkg_id.clone(),
                holder: Holder {
                    first_name: "John".to_string(),
                    last_name: "Doe".to_string(),
                    email: "john.doe@example.com".to_string(),
                    phone: Phone {
                        country_code: "US".to_string(),
                        country_number: 1,
                        number: "5551234567".to_string(),
                    },
                },
                guests: vec![guest("John", 35), guest("Jane", 32)],
                session_id: session_id.to_string(),
                ..Default::default()
            },
            cancel,
        )
        .await
        .context("booking")?;
    let order = booked.hotel_order.unwrap_or_default();
    info!(
        status = order.basic.status.0,
        supplier_reference_no = %order.basic.supplier_reference_no,
        "booking created"
    );

    match client
        .query_orders(
            &QueryOrdersReq {
                customer_reference_nos: vec![customer_reference_no.clone()],
                ..Default::default()
            },
            cancel,
        )
        .await
    {
        Ok(found) => info!(orders = found.orders.len(), "order lookup finished"),
        Err(e) => warn!("order lookup failed: {e}"),
    }

    let cancelled = client
        .cancel(
            &CancelReq {
                customer_reference_no,
                supplier_reference_no: order.basic.supplier_reference_no,
                ..Default::default()
            },
            cancel,
        )
        .await
        .context("cancellation")?;
    info!(
        status = cancelled.status.0,
        service_fee = cancelled.service_fee.amount,
        currency = %cancelled.service_fee.currency,
        "booking cancelled"
    );
    Ok(())
}
