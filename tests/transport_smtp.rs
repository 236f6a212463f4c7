use channel_probe::probe::MailProbe;
use channel_probe::smtp::authentication::Credentials;
use channel_probe::smtp::error::Error;
use channel_probe::smtp::extension::ClientId;
use channel_probe::{SmtpClient, SmtpTransport};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

const PLAIN_EHLO: &str = "250-mail.example.org\r\n250-AUTH PLAIN LOGIN\r\n250 8BITMIME\r\n";

/// What the scripted server answers
#[derive(Clone, Copy)]
struct Script {
    ehlo: &'static str,
    auth: &'static str,
}

impl Script {
    fn new(ehlo: &'static str) -> Self {
        Script {
            ehlo,
            auth: "235 2.7.0 Authentication successful\r\n",
        }
    }
}

/// Plays a minimal SMTP server on `stream` and returns everything the client sent.
async fn serve(stream: DuplexStream, script: Script) -> String {
    let (read, mut write) = tokio::io::split(stream);
    let mut reader = BufReader::new(read);
    let mut transcript = String::new();
    let mut in_data = false;
    let mut login_step = 0;

    write
        .write_all(b"220 mail.example.org ESMTP\r\n")
        .await
        .unwrap();

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await.unwrap() == 0 {
            break;
        }
        transcript.push_str(&line);

        if in_data {
            if line == ".\r\n" {
                in_data = false;
                write
                    .write_all(b"250 2.0.0 Ok: queued as 4F2A1C\r\n")
                    .await
                    .unwrap();
            }
            continue;
        }

        let reply = match login_step {
            1 => {
                login_step = 2;
                "334 UGFzc3dvcmQ6\r\n"
            }
            2 => {
                login_step = 0;
                script.auth
            }
            _ => match line.trim_end() {
                "AUTH LOGIN" => {
                    login_step = 1;
                    "334 VXNlcm5hbWU6\r\n"
                }
                command if command.starts_with("EHLO ") => script.ehlo,
                command if command.starts_with("AUTH ") => script.auth,
                command if command.starts_with("MAIL FROM:") => "250 2.1.0 Ok\r\n",
                command if command.starts_with("RCPT TO:") => "250 2.1.5 Ok\r\n",
                "DATA" => {
                    in_data = true;
                    "354 End data with <CR><LF>.<CR><LF>\r\n"
                }
                "STARTTLS" => {
                    write
                        .write_all(b"220 2.0.0 Ready to start TLS\r\n")
                        .await
                        .unwrap();
                    break;
                }
                "QUIT" => {
                    write.write_all(b"221 2.0.0 Bye\r\n").await.unwrap();
                    break;
                }
                _ => "500 5.5.2 Error: command not recognized\r\n",
            },
        };
        write.write_all(reply.as_bytes()).await.unwrap();
    }

    transcript
}

fn probe() -> MailProbe {
    MailProbe::new(
        "mail.example.org",
        Credentials::new("user".to_string(), "password".to_string()),
        "probe@example.org".parse().unwrap(),
        "ops@example.org".parse().unwrap(),
    )
    .hello_name(ClientId::new("probe.local".to_string()))
}

fn client() -> SmtpClient {
    SmtpClient::new().hello_name(ClientId::new("probe.local".to_string()))
}

#[tokio::test]
async fn deliver_with_plain_auth() {
    let (stream, server) = tokio::io::duplex(4096);
    let server = tokio::spawn(serve(server, Script::new(PLAIN_EHLO)));

    let probe = probe();
    let mut transport = SmtpTransport::new(client(), stream).await.unwrap();
    let response = probe
        .deliver(&mut transport, probe.message("Testing!").unwrap())
        .await
        .unwrap();
    assert!(response.has_code(250));
    assert_eq!(response.first_line(), Some("2.0.0 Ok: queued as 4F2A1C"));
    drop(transport);

    assert_eq!(
        server.await.unwrap(),
        "EHLO probe.local\r\n\
         AUTH PLAIN AHVzZXIAcGFzc3dvcmQ=\r\n\
         MAIL FROM:<probe@example.org> BODY=8BITMIME\r\n\
         RCPT TO:<ops@example.org>\r\n\
         DATA\r\n\
         From: probe@example.org\r\n\
         To: ops@example.org\r\n\
         \r\n\
         Testing!\r\n\
         .\r\n\
         QUIT\r\n"
    );
}

#[tokio::test]
async fn deliver_with_login_auth_and_pipelining() {
    let (stream, server) = tokio::io::duplex(4096);
    let server = tokio::spawn(serve(
        server,
        Script::new("250-mail.example.org\r\n250-PIPELINING\r\n250 AUTH LOGIN\r\n"),
    ));

    let probe = probe();
    let mut transport = SmtpTransport::new(client(), stream).await.unwrap();
    probe
        .deliver(&mut transport, probe.message(".hidden").unwrap())
        .await
        .unwrap();
    drop(transport);

    assert_eq!(
        server.await.unwrap(),
        "EHLO probe.local\r\n\
         AUTH LOGIN\r\n\
         dXNlcg==\r\n\
         cGFzc3dvcmQ=\r\n\
         MAIL FROM:<probe@example.org>\r\n\
         RCPT TO:<ops@example.org>\r\n\
         DATA\r\n\
         From: probe@example.org\r\n\
         To: ops@example.org\r\n\
         \r\n\
         ..hidden\r\n\
         .\r\n\
         QUIT\r\n"
    );
}

#[tokio::test]
async fn rejected_credentials_stop_the_probe() {
    let (stream, server) = tokio::io::duplex(4096);
    let server = tokio::spawn(serve(
        server,
        Script {
            ehlo: PLAIN_EHLO,
            auth: "535 5.7.8 Error: authentication failed\r\n",
        },
    ));

    let probe = probe();
    let mut transport = SmtpTransport::new(client(), stream).await.unwrap();
    let result = probe
        .deliver(&mut transport, probe.message("Testing!").unwrap())
        .await;
    assert!(matches!(result, Err(Error::Permanent(_))));
    drop(transport);

    let transcript = server.await.unwrap();
    assert!(!transcript.contains("MAIL FROM"));
}

#[tokio::test]
async fn server_without_auth_is_refused() {
    let (stream, server) = tokio::io::duplex(4096);
    let server = tokio::spawn(serve(server, Script::new("250 mail.example.org\r\n")));

    let probe = probe();
    let mut transport = SmtpTransport::new(client(), stream).await.unwrap();
    let result = probe
        .deliver(&mut transport, probe.message("Testing!").unwrap())
        .await;
    assert!(matches!(result, Err(Error::Client(_))));
    drop(transport);

    assert_eq!(server.await.unwrap(), "EHLO probe.local\r\n");
}

#[tokio::test]
async fn starttls_hands_back_the_stream() {
    let (stream, server) = tokio::io::duplex(4096);
    let server = tokio::spawn(serve(
        server,
        Script::new("250-mail.example.org\r\n250-STARTTLS\r\n250 8BITMIME\r\n"),
    ));

    let stream = probe().starttls(stream).await.unwrap();
    assert_eq!(
        server.await.unwrap(),
        "EHLO probe.local\r\nSTARTTLS\r\n"
    );
    drop(stream);
}

#[tokio::test]
async fn starttls_is_required() {
    let (stream, server) = tokio::io::duplex(4096);
    let server = tokio::spawn(serve(server, Script::new(PLAIN_EHLO)));

    let result = probe().starttls(stream).await;
    assert!(matches!(
        result,
        Err(Error::Client("server does not support STARTTLS"))
    ));

    assert_eq!(server.await.unwrap(), "EHLO probe.local\r\n");
}
