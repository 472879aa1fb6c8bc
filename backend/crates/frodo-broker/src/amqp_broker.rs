use crate::{BrokerMessage, Result};

use std::future::Future;

use futures::StreamExt;
use lapin::message::Delivery;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicQosOptions, BasicRejectOptions,
    ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{Channel, Connection, ConnectionProperties, Consumer, ExchangeKind};
use log::{debug, error, info, warn};
use metrics::counter;
use tokio::task::JoinHandle;

const CONSUMER_TAG: &str = "frodo";
const CLOSE_REPLY_CODE: u16 = 200;
/// Unacked deliveries the server may push before waiting for acks
const PREFETCH_COUNT: u16 = 256;

/// Consumer bound to a fanout exchange through a private queue.
///
/// Every gateway node declares its own exclusive queue, so each node sees
/// every message published to the exchange.
pub struct AmqpBroker {
    connection: Connection,
    channel: Channel,
    exchange: String,
    queue: String,
}

impl AmqpBroker {
    /// Connect, declare the exchange and bind a server-named queue to it
    pub async fn connect(url: &str, exchange: &str) -> Result<Self> {
        let connection = Connection::connect(url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;

        channel
            .exchange_declare(
                exchange,
                ExchangeKind::Fanout,
                ExchangeDeclareOptions {
                    durable: true,
                    ..ExchangeDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        let queue = channel
            .queue_declare(
                "",
                QueueDeclareOptions {
                    exclusive: true,
                    auto_delete: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;
        let queue = queue.name().as_str().to_string();

        channel
            .queue_bind(
                &queue,
                exchange,
                "",
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;

        channel
            .basic_qos(PREFETCH_COUNT, BasicQosOptions::default())
            .await?;

        info!("Connected to broker, queue {queue} bound to exchange {exchange}");

        Ok(Self {
            connection,
            channel,
            exchange: exchange.to_string(),
            queue,
        })
    }

    /// Start consuming and hand each decoded message to `handler`.
    ///
    /// The handler runs on a single task, one delivery at a time, in arrival
    /// order, and each delivery is acked once its handler future completes.
    /// The task ends when the channel is closed.
    pub async fn start_listening<F, Fut>(&self, handler: F) -> Result<JoinHandle<()>>
    where
        F: Fn(BrokerMessage) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let consumer = self
            .channel
            .basic_consume(
                &self.queue,
                CONSUMER_TAG,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        info!("Listening on exchange {}", self.exchange);
        Ok(tokio::spawn(consume(consumer, handler)))
    }

    pub fn ping(&self) -> bool {
        self.connection.status().connected()
    }

    /// Close the channel, then the connection
    pub async fn close(&self) -> Result<()> {
        if self.channel.status().connected() {
            self.channel.close(CLOSE_REPLY_CODE, "shutdown").await?;
        }
        if self.connection.status().connected() {
            self.connection.close(CLOSE_REPLY_CODE, "shutdown").await?;
        }

        info!("Broker connection closed");
        Ok(())
    }
}

async fn consume<F, Fut>(mut consumer: Consumer, handler: F)
where
    F: Fn(BrokerMessage) -> Fut,
    Fut: Future<Output = ()>,
{
    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => handle_delivery(delivery, &handler).await,
            Err(e) => {
                error!("Broker consumer failed: {e}");
                break;
            }
        }
    }

    info!("Broker consumer stopped");
}

async fn handle_delivery<F, Fut>(delivery: Delivery, handler: &F)
where
    F: Fn(BrokerMessage) -> Fut,
    Fut: Future<Output = ()>,
{
    match BrokerMessage::decode(&delivery.data) {
        Ok(message) => {
            debug!("Received message for {}", message.channel);
            counter!("frodo_broker.deliveries.received").increment(1);
            handler(message).await;

            if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
                warn!("Failed to ack delivery: {e}");
            }
        }
        Err(e) => {
            warn!("Rejecting delivery: {e}");
            counter!("frodo_broker.deliveries.rejected").increment(1);

            if let Err(e) = delivery
                .reject(BasicRejectOptions { requeue: false })
                .await
            {
                warn!("Failed to reject delivery: {e}");
            }
        }
    }
}
