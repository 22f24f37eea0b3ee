use std::time::Instant;

use actix::{Actor, ActorContext, AsyncContext, Handler, Message, Running, StreamHandler};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;

use system::{new_connection_id, ClientCommand, ConnectionId, ServerEvent};

use crate::config::Heartbeat;
use crate::connection_tx_storage::ConnectionTx;
use crate::server::{ServerCommand, ServerTx};

#[derive(Debug)]
pub enum ConnectionCommand {
    Connect { id: ConnectionId, tx: ConnectionTx },
    Disconnect { from: ConnectionId },
    ClientCommand { from: ConnectionId, command: ClientCommand },
}

#[derive(Message)]
#[rtype(result = "()")]
struct ConnectionActorMessage(ServerEvent);

/// One websocket. Its id is minted here, so the server queue sees `Connect`
/// before any command and `Disconnect` after all of them.
struct ConnectionActor {
    id: ConnectionId,
    srv_tx: ServerTx,
    buffer: usize,
    heartbeat: Heartbeat,
    last_seen: Instant,
}

impl ConnectionActor {
    fn submit(&self, command: ConnectionCommand) {
        if self.srv_tx.send(ServerCommand::Connection(command)).is_err() {
            log::warn!("Server task is gone, command dropped");
        }
    }

    fn watch_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(self.heartbeat.interval, |act, ctx| {
            if Instant::now().duration_since(act.last_seen) > act.heartbeat.timeout {
                log::info!("Client heartbeat timed out");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for ConnectionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<ServerEvent>(self.buffer);

        self.submit(ConnectionCommand::Connect { id: self.id, tx });
        self.watch_heartbeat(ctx);

        let addr = ctx.address();

        actix::spawn(async move {
            log::debug!("connection forwarder - started");
            while let Some(msg) = rx.recv().await {
                if addr.send(ConnectionActorMessage(msg)).await.is_err() {
                    break;
                }
            }
            log::debug!("connection forwarder - terminated");
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.submit(ConnectionCommand::Disconnect { from: self.id });

        Running::Stop
    }
}

/// Ingress
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ConnectionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        self.last_seen = Instant::now();
        let text = match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
                return;
            }
            Ok(ws::Message::Text(text)) => text.to_string(),
            Ok(ws::Message::Binary(bin)) => match String::from_utf8(bin.to_vec()) {
                Ok(text) => text,
                Err(_) => {
                    log::warn!("Ignored non UTF-8 binary frame ({} bytes)", bin.len());
                    return;
                }
            },
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
                return;
            }
            Err(err) => {
                log::warn!("Websocket protocol error: {}", err);
                ctx.stop();
                return;
            }
            _ => return,
        };

        log::debug!("Ingress size: {}", text.len());
        let from = self.id;
        match ClientCommand::decode(&text) {
            Ok(command) => {
                log::debug!("Ingress {:?}", command);
                self.submit(ConnectionCommand::ClientCommand { from, command });
            }
            Err(err) => log::warn!("Ignored frame from {}: {}", from, err),
        }
    }
}

/// Egress
impl Handler<ConnectionActorMessage> for ConnectionActor {
    type Result = ();

    fn handle(
        &mut self,
        msg: ConnectionActorMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) -> Self::Result {
        match msg.0.encode() {
            Ok(text) => {
                log::debug!("Egress size: {}", text.len());
                ctx.text(text);
            }
            Err(err) => log::warn!("{}", err),
        }
    }
}

pub struct ConnectionSettings {
    pub buffer: usize,
    pub heartbeat: Heartbeat,
}

pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    srv_tx: web::Data<ServerTx>,
    settings: web::Data<ConnectionSettings>,
) -> Result<HttpResponse, Error> {
    ws::start(
        ConnectionActor {
            id: new_connection_id(),
            srv_tx: srv_tx.get_ref().clone(),
            buffer: settings.buffer,
            heartbeat: settings.heartbeat,
            last_seen: Instant::now(),
        },
        &req,
        stream,
    )
}
